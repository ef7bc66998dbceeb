//! Render fan-out.
//!
//! The core never draws anything itself. After every mutation it builds a
//! [`RenderView`] snapshot and hands it to the configured [`Renderer`] —
//! a single entry point the (external) view layer hangs off. The view is
//! already filtered by role: what is absent from the snapshot is not the
//! renderer's to show.

use crate::models::{Faq, ImageAsset, Role, Session, Video};
use crate::store::CatalogStore;
use crate::thumbs::category_thumb;

/// One category tile for the home view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub name: String,
    pub count: usize,
    /// First video's thumb in the category, or a synthesized placeholder
    /// for an empty registry-only category.
    pub thumb: String,
}

/// Everything the render layer is permitted to show, in display order.
#[derive(Debug, Clone)]
pub struct RenderView {
    pub session: Option<Session>,
    /// Student-facing category tiles (sentinel excluded). Empty for
    /// guests — they see the login prompt instead.
    pub categories: Vec<CategoryCard>,
    /// Full video list. Admin only.
    pub videos: Vec<Video>,
    /// Most recent first.
    pub faqs: Vec<Faq>,
    pub images: Vec<ImageAsset>,
}

/// Snapshot the store for rendering, applying role visibility.
pub fn build_view(
    store: &CatalogStore,
    session: Option<&Session>,
    sentinel: &str,
) -> RenderView {
    let categories = match session {
        Some(_) => store
            .student_categories(sentinel)
            .into_iter()
            .map(|name| {
                let in_cat = store.videos_in_category(&name);
                CategoryCard {
                    thumb: in_cat
                        .first()
                        .map(|v| v.thumb.clone())
                        .unwrap_or_else(|| category_thumb(&name)),
                    count: in_cat.len(),
                    name,
                }
            })
            .collect(),
        None => Vec::new(),
    };

    let videos = match session {
        Some(s) if s.role == Role::Admin => store.videos().to_vec(),
        _ => Vec::new(),
    };

    let mut faqs = store.faqs().to_vec();
    faqs.reverse();

    RenderView {
        session: session.cloned(),
        categories,
        videos,
        faqs,
        images: store.images().to_vec(),
    }
}

/// Sink for [`RenderView`] snapshots.
pub trait Renderer {
    /// Called after any state change.
    fn render(&self, view: &RenderView);
}

/// Default CLI renderer: a compact textual snapshot on stdout.
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&self, view: &RenderView) {
        match &view.session {
            Some(s) => println!("session: {} — {}", s.name, s.role.as_str()),
            None => println!("session: guest"),
        }

        if !view.categories.is_empty() {
            println!("{:<28} {:>6}", "CATEGORY", "VIDEOS");
            for card in &view.categories {
                println!("{:<28} {:>6}", card.name, card.count);
            }
        }

        if !view.videos.is_empty() {
            println!("{:<38} {:<20} TITLE", "ID", "CATEGORY");
            for v in &view.videos {
                println!("{:<38} {:<20} {}", v.id, v.category, v.title);
            }
        }

        if !view.faqs.is_empty() {
            println!("faqs: {}", view.faqs.len());
        }
        if !view.images.is_empty() {
            println!("images: {}", view.images.len());
        }
    }
}

/// Renderer that drops every snapshot (tests, scripting).
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _view: &RenderView) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::now_millis;

    fn video(id: &str, category: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            link: "https://youtu.be/x".to_string(),
            category: category.to_string(),
            thumb: format!("thumb-{}", id),
            created: now_millis(),
        }
    }

    fn session(role: Role) -> Session {
        Session {
            role,
            name: "tester".to_string(),
        }
    }

    #[test]
    fn test_guest_sees_nothing() {
        let mut store = CatalogStore::new();
        store.upsert_video(video("a", "General"));
        let view = build_view(&store, None, "Welcome");
        assert!(view.categories.is_empty());
        assert!(view.videos.is_empty());
    }

    #[test]
    fn test_student_gets_cards_without_sentinel_and_no_video_list() {
        let mut store = CatalogStore::new();
        store.upsert_video(video("a", "General"));
        store.upsert_video(video("w", "Welcome"));

        let s = session(Role::Student);
        let view = build_view(&store, Some(&s), "Welcome");
        let names: Vec<&str> = view.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["General"]);
        assert!(view.videos.is_empty());
    }

    #[test]
    fn test_admin_video_list_includes_sentinel_entries() {
        let mut store = CatalogStore::new();
        store.upsert_video(video("a", "General"));
        store.upsert_video(video("w", "Welcome"));

        let s = session(Role::Admin);
        let view = build_view(&store, Some(&s), "Welcome");
        assert_eq!(view.videos.len(), 2);
        assert!(view.videos.iter().any(|v| v.category == "Welcome"));
    }

    #[test]
    fn test_card_thumb_falls_back_for_empty_category() {
        let mut store = CatalogStore::new();
        store.upsert_video(video("a", "General"));
        store.set_registry(vec!["Empty".to_string()]);

        let s = session(Role::Student);
        let view = build_view(&store, Some(&s), "Welcome");
        let empty = view.categories.iter().find(|c| c.name == "Empty").unwrap();
        assert_eq!(empty.count, 0);
        assert!(empty.thumb.starts_with("data:image/svg+xml;base64,"));
        let general = view.categories.iter().find(|c| c.name == "General").unwrap();
        assert_eq!(general.thumb, "thumb-a");
    }

    #[test]
    fn test_faqs_render_most_recent_first() {
        let mut store = CatalogStore::new();
        store.add_faq(Faq {
            id: "f1".to_string(),
            q: "Old?".to_string(),
            a: "Yes.".to_string(),
        });
        store.add_faq(Faq {
            id: "f2".to_string(),
            q: "New?".to_string(),
            a: "Yes.".to_string(),
        });
        let view = build_view(&store, None, "Welcome");
        assert_eq!(view.faqs[0].id, "f2");
        assert_eq!(view.faqs[1].id, "f1");
    }
}
