//! Persisted local state.
//!
//! The browser-storage analog: each entity collection is one JSON record
//! under a fixed, versioned key in the `state` table, alongside the
//! session record and the one-time onboarding flag. The store is loaded
//! whole at startup and written back whole after mutations —
//! last-write-wins, matching the catalog's consistency model.

use anyhow::Result;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{Faq, ImageAsset, Session, Video};
use crate::store::CatalogStore;

pub const KEY_VIDEOS: &str = "videos.v2";
pub const KEY_FAQS: &str = "faqs.v2";
pub const KEY_IMAGES: &str = "images.v2";
pub const KEY_CATEGORIES: &str = "categories.v1";
pub const KEY_SESSION: &str = "session.v1";
pub const KEY_ONBOARDING: &str = "onboarding.v1";

pub async fn put<T: Serialize>(pool: &SqlitePool, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    let now = Utc::now().timestamp();
    sqlx::query(
        r#"
        INSERT INTO state (key, value, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(json)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get<T: DeserializeOwned>(pool: &SqlitePool, key: &str) -> Result<Option<T>> {
    let json: Option<String> = sqlx::query_scalar("SELECT value FROM state WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    match json {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub async fn delete(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM state WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

/// Rebuild the catalog store from the persisted collections.
pub async fn load_store(pool: &SqlitePool) -> Result<CatalogStore> {
    let mut store = CatalogStore::new();
    if let Some(videos) = get::<Vec<Video>>(pool, KEY_VIDEOS).await? {
        store.replace_all_videos(videos);
    }
    if let Some(faqs) = get::<Vec<Faq>>(pool, KEY_FAQS).await? {
        for faq in faqs {
            store.add_faq(faq);
        }
    }
    if let Some(images) = get::<Vec<ImageAsset>>(pool, KEY_IMAGES).await? {
        store.append_images(images);
    }
    if let Some(categories) = get::<Vec<String>>(pool, KEY_CATEGORIES).await? {
        store.set_registry(categories);
    }
    Ok(store)
}

/// Write every collection back under its fixed key.
pub async fn save_store(pool: &SqlitePool, store: &CatalogStore) -> Result<()> {
    put(pool, KEY_VIDEOS, &store.videos()).await?;
    put(pool, KEY_FAQS, &store.faqs()).await?;
    put(pool, KEY_IMAGES, &store.images()).await?;
    put(pool, KEY_CATEGORIES, &store.registry()).await?;
    Ok(())
}

pub async fn load_session(pool: &SqlitePool) -> Result<Option<Session>> {
    get(pool, KEY_SESSION).await
}

pub async fn save_session(pool: &SqlitePool, session: &Session) -> Result<()> {
    put(pool, KEY_SESSION, session).await
}

pub async fn clear_session(pool: &SqlitePool) -> Result<()> {
    delete(pool, KEY_SESSION).await
}

pub async fn onboarding_done(pool: &SqlitePool) -> Result<bool> {
    Ok(get::<bool>(pool, KEY_ONBOARDING).await?.unwrap_or(false))
}

pub async fn set_onboarding_done(pool: &SqlitePool) -> Result<()> {
    put(pool, KEY_ONBOARDING, &true).await
}
