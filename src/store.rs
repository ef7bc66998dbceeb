//! In-memory catalog store.
//!
//! Single source of truth for rendering: videos, FAQs, images, and the
//! category registry live here. All mutation primitives are synchronous
//! and side-effect-free beyond the store itself — no I/O, no rendering.
//! Callers (the CRUD layer and the sync coordinator) are responsible for
//! persistence and for triggering a re-render afterwards.
//!
//! The store is an explicitly owned value with a defined lifecycle:
//! constructed at startup (usually from the persisted state), mutated by
//! exactly one logical thread of control, torn down at session end.

use crate::models::{Faq, ImageAsset, Video};

#[derive(Debug, Default)]
pub struct CatalogStore {
    videos: Vec<Video>,
    faqs: Vec<Faq>,
    images: Vec<ImageAsset>,
    /// Categories supplied by the remote registry (or added locally),
    /// independent of the categories implied by video membership.
    registry: Vec<String>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn faqs(&self) -> &[Faq] {
        &self.faqs
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    pub fn registry(&self) -> &[String] {
        &self.registry
    }

    pub fn find_video(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    /// Insert or update a video, matching by `id`.
    ///
    /// An existing entry is replaced in place, preserving its position;
    /// otherwise the video is appended.
    pub fn upsert_video(&mut self, video: Video) {
        match self.videos.iter_mut().find(|v| v.id == video.id) {
            Some(existing) => *existing = video,
            None => self.videos.push(video),
        }
    }

    /// Remove a video by id. Removing an unknown id leaves the sequence
    /// unchanged and returns `false`.
    pub fn remove_video(&mut self, id: &str) -> bool {
        let before = self.videos.len();
        self.videos.retain(|v| v.id != id);
        self.videos.len() != before
    }

    /// Replace the whole video collection (remote fetch result).
    pub fn replace_all_videos(&mut self, videos: Vec<Video>) {
        self.videos = videos;
    }

    pub fn find_faq(&self, id: &str) -> Option<&Faq> {
        self.faqs.iter().find(|f| f.id == id)
    }

    pub fn add_faq(&mut self, faq: Faq) {
        self.faqs.push(faq);
    }

    /// Update a FAQ in place, keeping its id and insertion position.
    pub fn update_faq(&mut self, id: &str, q: String, a: String) -> bool {
        match self.faqs.iter_mut().find(|f| f.id == id) {
            Some(faq) => {
                faq.q = q;
                faq.a = a;
                true
            }
            None => false,
        }
    }

    pub fn remove_faq(&mut self, id: &str) -> bool {
        let before = self.faqs.len();
        self.faqs.retain(|f| f.id != id);
        self.faqs.len() != before
    }

    /// Append a fully-decoded image batch. Batches are validated by the
    /// upload path before they reach the store.
    pub fn append_images(&mut self, images: Vec<ImageAsset>) {
        self.images.extend(images);
    }

    /// Replace the category registry with a deduplicated, sorted set.
    pub fn set_registry(&mut self, categories: Vec<String>) {
        let mut registry: Vec<String> = categories
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect();
        registry.sort();
        registry.dedup();
        self.registry = registry;
    }

    /// Add one category to the registry, keeping it sorted. Returns
    /// `false` if it was already present.
    pub fn add_registry_category(&mut self, name: &str) -> bool {
        if name.is_empty() || self.registry.iter().any(|c| c == name) {
            return false;
        }
        self.registry.push(name.to_string());
        self.registry.sort();
        true
    }

    /// Student-facing category list: the sentinel category is hidden.
    pub fn student_categories(&self, sentinel: &str) -> Vec<String> {
        derive_categories(&self.videos, &self.registry, Some(sentinel))
    }

    /// Full category list, sentinel included (admin views).
    pub fn all_categories(&self) -> Vec<String> {
        derive_categories(&self.videos, &self.registry, None)
    }

    pub fn videos_in_category(&self, category: &str) -> Vec<&Video> {
        self.videos.iter().filter(|v| v.category == category).collect()
    }
}

/// Derive the merged category list from the current videos and the
/// category registry: the union of both, deduplicated, case-sensitive,
/// sorted ascending. `exclude` drops a designated sentinel category.
pub fn derive_categories(
    videos: &[Video],
    registry: &[String],
    exclude: Option<&str>,
) -> Vec<String> {
    let mut cats: Vec<String> = registry
        .iter()
        .cloned()
        .chain(videos.iter().map(|v| v.category.clone()))
        .filter(|c| !c.is_empty() && exclude != Some(c.as_str()))
        .collect();
    cats.sort();
    cats.dedup();
    cats
}
