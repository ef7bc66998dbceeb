//! Catalog operations.
//!
//! [`CatalogApp`] owns the store for the lifetime of a session and is the
//! only mutation path: every operation applies its local change
//! synchronously, persists, requests a re-render through the single
//! fan-out entry point, and only then issues any best-effort remote push.
//! Pushes are optimistic — a transport failure is logged and never rolls
//! the local change back or surfaces as an operation failure.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::config::Config;
use crate::db;
use crate::export::{export_videos_csv, parse_videos_csv};
use crate::gateway::{PushAction, RemoteGateway};
use crate::images::read_images;
use crate::models::{new_id, now_millis, Faq, Role, Session, Video, VideoDraft};
use crate::persist;
use crate::render::{build_view, Renderer};
use crate::session;
use crate::store::CatalogStore;
use crate::sync::{seed_demo_if_empty, LoadOutcome, SyncCoordinator};
use crate::traits::CatalogBackend;

/// Settle time granted to the backend between an edit's delete/recreate
/// pushes and the reconciling re-fetch.
pub const REFETCH_DELAY: Duration = Duration::from_millis(800);

pub struct CatalogApp {
    config: Config,
    pool: SqlitePool,
    store: CatalogStore,
    session: Option<Session>,
    sync: SyncCoordinator,
    backend: Option<Box<dyn CatalogBackend>>,
    renderer: Box<dyn Renderer>,
    /// Id currently marked as "being edited"; consumed by the next save.
    editing: Option<String>,
}

impl CatalogApp {
    /// Open the catalog: connect storage, load the persisted state and
    /// session, and wire the remote gateway when one is configured.
    pub async fn open(config: Config, renderer: Box<dyn Renderer>) -> Result<Self> {
        let pool = db::connect(&config).await?;
        let store = persist::load_store(&pool)
            .await
            .context("failed to load catalog state (did you run `vcat init`?)")?;
        let session = persist::load_session(&pool).await?;

        let backend: Option<Box<dyn CatalogBackend>> = config.remote.url.clone().map(|url| {
            Box::new(RemoteGateway::new(
                url,
                config.catalog.default_category.clone(),
            )) as Box<dyn CatalogBackend>
        });

        Ok(Self {
            config,
            pool,
            store,
            session,
            sync: SyncCoordinator::new(),
            backend,
            renderer,
            editing: None,
        })
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn has_remote(&self) -> bool {
        self.backend.is_some()
    }

    pub fn sentinel_category(&self) -> &str {
        &self.config.catalog.sentinel_category
    }

    /// Single render fan-out, invoked after every mutating operation.
    pub fn render(&self) {
        let view = build_view(
            &self.store,
            self.session.as_ref(),
            &self.config.catalog.sentinel_category,
        );
        self.renderer.render(&view);
    }

    async fn persist(&self) -> Result<()> {
        persist::save_store(&self.pool, &self.store).await
    }

    /// Fire one mutation at the backend and move on. Transport failures
    /// are logged; backend-side outcomes are unobservable either way.
    async fn push_best_effort(&self, action: PushAction) {
        if let Some(backend) = &self.backend {
            if let Err(err) = backend.push(action.clone()).await {
                warn!("{} push dropped: {}", action.name(), err);
            }
        }
    }

    fn require_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("login required"))
    }

    fn require_admin(&self) -> Result<()> {
        match self.require_session()?.role {
            Role::Admin => Ok(()),
            Role::Student => bail!("admin session required"),
        }
    }

    // ── sync ──────────────────────────────────────────────────────────

    /// Load the catalog from the remote, or seed demo data when running
    /// purely locally. `force` re-fetches even when already loaded.
    pub async fn sync_catalog(&mut self, force: bool) -> Result<LoadOutcome> {
        let outcome = match &self.backend {
            Some(backend) => {
                if force {
                    self.sync.refresh(&mut self.store, backend.as_ref()).await
                } else {
                    self.sync
                        .ensure_loaded(&mut self.store, backend.as_ref())
                        .await
                }
            }
            None => {
                if seed_demo_if_empty(&mut self.store, &self.config.catalog) {
                    debug!("no remote configured; seeded demo categories");
                }
                LoadOutcome::Skipped
            }
        };

        if !matches!(outcome, LoadOutcome::AlreadyLoading) {
            self.persist().await?;
            self.render();
        }
        Ok(outcome)
    }

    // ── videos ────────────────────────────────────────────────────────

    /// Mark a video as being edited; the next [`save_video`] call
    /// updates it in place. Returns the current entry for prefill.
    ///
    /// [`save_video`]: CatalogApp::save_video
    pub fn mark_editing(&mut self, id: &str) -> Result<Video> {
        let video = self
            .store
            .find_video(id)
            .cloned()
            .with_context(|| format!("video not found: {}", id))?;
        self.editing = Some(video.id.clone());
        Ok(video)
    }

    /// Create a video, or update the one marked as being edited.
    ///
    /// Rejects drafts missing a title, link, or category. The thumbnail
    /// is derived from the link before the entry is committed. For
    /// edits, the remote has no in-place update: the old entry is
    /// delete-pushed, the new one add-pushed, and after a settle delay
    /// the catalog is re-fetched to reconcile.
    pub async fn save_video(&mut self, draft: VideoDraft) -> Result<Video> {
        self.require_admin()?;

        let title = draft.title.trim().to_string();
        let link = draft.link.trim().to_string();
        let category = draft.category.trim().to_string();
        if title.is_empty() || link.is_empty() {
            bail!("a title and a link are required");
        }
        if category.is_empty() {
            bail!("a category is required");
        }

        let thumb = crate::thumbs::thumbnail_from_link(&link);
        let editing = self.editing.take();
        let video = Video {
            id: editing.clone().unwrap_or_else(new_id),
            title,
            link,
            category,
            thumb,
            created: now_millis(),
        };

        self.store.upsert_video(video.clone());
        self.persist().await?;
        self.render();

        match editing {
            Some(id) => {
                self.push_best_effort(PushAction::DeleteVideo { id }).await;
                self.push_best_effort(PushAction::AddVideo {
                    video: video.clone(),
                })
                .await;
                if let Some(backend) = &self.backend {
                    tokio::time::sleep(REFETCH_DELAY).await;
                    self.sync.refresh(&mut self.store, backend.as_ref()).await;
                    self.persist().await?;
                    self.render();
                }
            }
            None => {
                self.push_best_effort(PushAction::AddVideo {
                    video: video.clone(),
                })
                .await;
            }
        }

        Ok(video)
    }

    /// Delete a video. Confirmation is the caller's concern; by the time
    /// this runs the decision is made.
    ///
    /// The remote delete is fired first, best-effort, then the entry is
    /// removed locally regardless — the local store is the visible truth
    /// and the mirror catches up eventually. An unknown id is a logged
    /// no-op, not an error.
    pub async fn delete_video(&mut self, id: &str) -> Result<bool> {
        self.require_admin()?;

        if self.store.find_video(id).is_none() {
            debug!("delete requested for unknown video {}", id);
            return Ok(false);
        }

        self.push_best_effort(PushAction::DeleteVideo { id: id.to_string() })
            .await;

        self.store.remove_video(id);
        self.persist().await?;
        self.render();
        Ok(true)
    }

    // ── categories ────────────────────────────────────────────────────

    /// Register a category, pushing it to the remote registry
    /// best-effort. Returns `false` when it already existed.
    pub async fn add_category(&mut self, name: &str) -> Result<bool> {
        self.require_admin()?;
        let name = name.trim();
        if name.is_empty() {
            bail!("a category name is required");
        }

        self.push_best_effort(PushAction::AddCategory {
            name: name.to_string(),
        })
        .await;

        let added = self.store.add_registry_category(name);
        self.persist().await?;
        self.render();
        Ok(added)
    }

    // ── faqs ──────────────────────────────────────────────────────────

    /// Add a FAQ. An empty question is treated as user cancellation and
    /// silently aborts (`Ok(None)`). Create is the only FAQ operation
    /// with a remote path.
    pub async fn add_faq(&mut self, q: &str, a: &str) -> Result<Option<Faq>> {
        self.require_session()?;
        let q = q.trim();
        if q.is_empty() {
            return Ok(None);
        }

        let faq = Faq {
            id: new_id(),
            q: q.to_string(),
            a: a.trim().to_string(),
        };
        self.store.add_faq(faq.clone());
        self.persist().await?;
        self.render();

        self.push_best_effort(PushAction::AddFaq { faq: faq.clone() })
            .await;
        Ok(Some(faq))
    }

    /// Edit a FAQ in place. Local-only. Unknown id → logged no-op.
    pub async fn update_faq(&mut self, id: &str, q: &str, a: &str) -> Result<bool> {
        self.require_session()?;
        if !self
            .store
            .update_faq(id, q.trim().to_string(), a.trim().to_string())
        {
            debug!("edit requested for unknown faq {}", id);
            return Ok(false);
        }
        self.persist().await?;
        self.render();
        Ok(true)
    }

    /// Remove a FAQ. Local-only. Unknown id → logged no-op.
    pub async fn remove_faq(&mut self, id: &str) -> Result<bool> {
        self.require_session()?;
        if !self.store.remove_faq(id) {
            debug!("delete requested for unknown faq {}", id);
            return Ok(false);
        }
        self.persist().await?;
        self.render();
        Ok(true)
    }

    // ── images ────────────────────────────────────────────────────────

    /// Decode and append a batch of images. The whole batch is rejected
    /// if any file fails; nothing partial is committed.
    pub async fn upload_images(&mut self, paths: &[PathBuf]) -> Result<usize> {
        self.require_admin()?;
        let assets = read_images(paths).await?;
        let count = assets.len();
        self.store.append_images(assets);
        self.persist().await?;
        self.render();
        Ok(count)
    }

    // ── csv ───────────────────────────────────────────────────────────

    pub fn export_csv(&self) -> Result<String> {
        if self.store.videos().is_empty() {
            bail!("no videos to export");
        }
        Ok(export_videos_csv(self.store.videos()))
    }

    /// Import videos from CSV text. Local-only, like the original
    /// import path: imported rows are not pushed to the remote.
    pub async fn import_csv(&mut self, text: &str) -> Result<usize> {
        self.require_admin()?;
        let videos = parse_videos_csv(text, &self.config.catalog.default_category);
        let count = videos.len();
        for video in videos {
            self.store.upsert_video(video);
        }
        self.persist().await?;
        self.render();
        Ok(count)
    }

    // ── session & onboarding ──────────────────────────────────────────

    pub async fn login(&mut self, role: Role, user: &str, pass: &str) -> Result<Session> {
        let session = session::login(&self.config, role, user, pass)?;
        persist::save_session(&self.pool, &session).await?;
        self.session = Some(session.clone());
        self.render();
        Ok(session)
    }

    pub async fn logout(&mut self) -> Result<()> {
        persist::clear_session(&self.pool).await?;
        self.session = None;
        self.render();
        Ok(())
    }

    /// First video in the sentinel category, if any.
    pub fn onboarding_video(&self) -> Option<&Video> {
        self.store
            .videos()
            .iter()
            .find(|v| v.category == self.config.catalog.sentinel_category)
    }

    pub async fn onboarding_done(&self) -> Result<bool> {
        persist::onboarding_done(&self.pool).await
    }

    pub async fn complete_onboarding(&self) -> Result<()> {
        persist::set_onboarding_done(&self.pool).await
    }
}
