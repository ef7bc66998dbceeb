//! Sync coordination between the remote backend and the local store.
//!
//! Loads the authoritative video set exactly once per session unless
//! explicitly reset, guarded by a small state machine so that two
//! overlapping load requests can never produce two outstanding fetches.
//!
//! ```text
//!            ┌────── explicit reset/refresh ──────┐
//!            ▼                                    │
//!   Idle ── begin ──▶ Loading ── success ──▶ Loaded
//!            ▲            │
//!            │         failure
//!         (retry) ◀── Failed
//! ```
//!
//! A failed load leaves the store untouched — no partial writes — and is
//! not surfaced as a user-visible error; it only logs and permits a later
//! retry.

use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::store::CatalogStore;
use crate::traits::CatalogBackend;

/// Load lifecycle of the catalog for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load attempted yet (or explicitly reset).
    Idle,
    /// A fetch is outstanding; further load requests are no-ops.
    Loading,
    /// The store holds the last fetched video set.
    Loaded,
    /// The last fetch failed; the next load request may retry.
    Failed,
}

/// What a load request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetch succeeded and the store was replaced with `videos` entries.
    Loaded { videos: usize },
    /// Another fetch was already outstanding; this request was dropped.
    AlreadyLoading,
    /// The catalog was already loaded this session; nothing to do.
    Skipped,
    /// The fetch failed; the store is unchanged and retry is permitted.
    Failed,
}

#[derive(Debug, Default)]
pub struct SyncCoordinator {
    state: LoadState,
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl SyncCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Drop back to [`LoadState::Idle`] so the next load fetches again.
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
    }

    /// Claim the one-shot loading slot. Returns `false` when a fetch is
    /// already outstanding.
    fn begin(&mut self) -> bool {
        if self.state == LoadState::Loading {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Load the catalog unless it is already loaded this session.
    pub async fn ensure_loaded(
        &mut self,
        store: &mut CatalogStore,
        backend: &dyn CatalogBackend,
    ) -> LoadOutcome {
        if self.state == LoadState::Loaded {
            return LoadOutcome::Skipped;
        }
        self.load(store, backend).await
    }

    /// Fetch the video set and category registry, replacing the store's
    /// video collection wholesale on success.
    pub async fn load(
        &mut self,
        store: &mut CatalogStore,
        backend: &dyn CatalogBackend,
    ) -> LoadOutcome {
        if !self.begin() {
            debug!("catalog load already in flight; dropping request");
            return LoadOutcome::AlreadyLoading;
        }

        let videos = match backend.fetch_videos().await {
            Ok(videos) => videos,
            Err(err) => {
                // Store untouched; guard released so a later call retries.
                warn!("catalog fetch failed: {err:#}");
                self.state = LoadState::Failed;
                return LoadOutcome::Failed;
            }
        };

        let count = videos.len();
        store.replace_all_videos(videos);

        // Registry fetch is best-effort: the video set is already
        // authoritative, categories implied by videos still derive.
        match backend.fetch_categories().await {
            Ok(categories) => store.set_registry(categories),
            Err(err) => warn!("category registry fetch failed: {err:#}"),
        }

        self.state = LoadState::Loaded;
        LoadOutcome::Loaded { videos: count }
    }

    /// Force a fresh fetch (used to reconcile after an edit round-trip).
    pub async fn refresh(
        &mut self,
        store: &mut CatalogStore,
        backend: &dyn CatalogBackend,
    ) -> LoadOutcome {
        if self.state != LoadState::Loading {
            self.reset();
        }
        self.load(store, backend).await
    }
}

/// Populate fallback demo data: only when the store is empty and no
/// remote backend is configured does the registry get the configured
/// demo categories. Never fabricates videos.
pub fn seed_demo_if_empty(store: &mut CatalogStore, catalog: &CatalogConfig) -> bool {
    if !store.videos().is_empty() || !store.registry().is_empty() {
        return false;
    }
    store.set_registry(catalog.demo_categories.clone());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{PushAction, TransportError};
    use crate::models::Video;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        videos: Vec<Video>,
        fail: bool,
        fetches: AtomicUsize,
    }

    impl StubBackend {
        fn with_videos(videos: Vec<Video>) -> Self {
            Self {
                videos,
                fail: false,
                fetches: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                videos: Vec::new(),
                fail: true,
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogBackend for StubBackend {
        async fn fetch_videos(&self) -> Result<Vec<Video>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.videos.clone())
        }

        async fn fetch_categories(&self) -> Result<Vec<String>> {
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(vec!["Tutorial".to_string()])
        }

        async fn push(&self, _action: PushAction) -> std::result::Result<(), TransportError> {
            Ok(())
        }
    }

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            link: format!("https://youtu.be/{}", id),
            category: "General".to_string(),
            thumb: String::new(),
            created: 0,
        }
    }

    #[tokio::test]
    async fn test_loads_exactly_once_per_session() {
        let backend = StubBackend::with_videos(vec![video("a"), video("b")]);
        let mut store = CatalogStore::new();
        let mut sync = SyncCoordinator::new();

        let first = sync.ensure_loaded(&mut store, &backend).await;
        assert_eq!(first, LoadOutcome::Loaded { videos: 2 });
        assert_eq!(sync.state(), LoadState::Loaded);

        let second = sync.ensure_loaded(&mut store, &backend).await;
        assert_eq!(second, LoadOutcome::Skipped);
        assert_eq!(backend.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_outstanding_load_blocks_second_request() {
        let backend = StubBackend::with_videos(vec![video("a")]);
        let mut store = CatalogStore::new();
        let mut sync = SyncCoordinator::new();

        // Simulate an in-flight fetch holding the one-shot slot.
        assert!(sync.begin());
        assert!(!sync.begin());

        let outcome = sync.ensure_loaded(&mut store, &backend).await;
        assert_eq!(outcome, LoadOutcome::AlreadyLoading);
        assert_eq!(backend.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_leaves_store_untouched_and_permits_retry() {
        let failing = StubBackend::failing();
        let mut store = CatalogStore::new();
        store.replace_all_videos(vec![video("kept")]);
        let mut sync = SyncCoordinator::new();

        let outcome = sync.load(&mut store, &failing).await;
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(sync.state(), LoadState::Failed);
        assert_eq!(store.videos().len(), 1);
        assert_eq!(store.videos()[0].id, "kept");

        // Retry against a healthy backend succeeds.
        let healthy = StubBackend::with_videos(vec![video("fresh")]);
        let outcome = sync.ensure_loaded(&mut store, &healthy).await;
        assert_eq!(outcome, LoadOutcome::Loaded { videos: 1 });
        assert_eq!(store.videos()[0].id, "fresh");
    }

    #[tokio::test]
    async fn test_refresh_fetches_again_after_loaded() {
        let backend = StubBackend::with_videos(vec![video("a")]);
        let mut store = CatalogStore::new();
        let mut sync = SyncCoordinator::new();

        sync.ensure_loaded(&mut store, &backend).await;
        sync.refresh(&mut store, &backend).await;
        assert_eq!(backend.fetch_count(), 2);
        assert_eq!(sync.state(), LoadState::Loaded);
    }

    #[test]
    fn test_demo_seed_only_when_fully_empty() {
        let catalog = CatalogConfig::default();

        let mut store = CatalogStore::new();
        assert!(seed_demo_if_empty(&mut store, &catalog));
        assert_eq!(store.registry().len(), 4);
        assert!(store.videos().is_empty());

        // Already seeded → no-op.
        assert!(!seed_demo_if_empty(&mut store, &catalog));

        let mut store = CatalogStore::new();
        store.replace_all_videos(vec![video("a")]);
        assert!(!seed_demo_if_empty(&mut store, &catalog));
        assert!(store.registry().is_empty());
    }
}
