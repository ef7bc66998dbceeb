//! Remote catalog gateway.
//!
//! Thin HTTP client for the spreadsheet-backed catalog service. Knows
//! nothing about the UI or the store.
//!
//! # Wire contract
//!
//! - `GET {url}?action=get_videos` → JSON array of video rows. Rows
//!   missing `title` or `link` are dropped; a missing `id` gets a fresh
//!   one, `category` falls back to the configured default, `thumb` is
//!   derived from the link, `created` defaults to now (epoch millis).
//! - `GET {url}?action=get_categories` → JSON array of `{"category"}`.
//! - `POST {url}` with a JSON `{"action": ..., ...payload}` body for
//!   mutations. The transport mode makes responses opaque: status codes
//!   and bodies are not interpreted, and success is assumed once the
//!   request itself goes out. Only [`TransportError`] is observable.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{new_id, now_millis, Faq, Video};
use crate::thumbs::thumbnail_from_link;
use crate::traits::CatalogBackend;

/// Call-level failure of a fire-and-forget push.
///
/// This is the only failure a push can report. Backend-side rejection is
/// unobservable by design; see [`CatalogBackend::push`].
#[derive(Debug, Error)]
#[error("catalog push failed before reaching the backend: {source}")]
pub struct TransportError {
    #[from]
    source: reqwest::Error,
}

/// One mutation sent to the remote backend.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PushAction {
    AddVideo { video: Video },
    DeleteVideo { id: String },
    AddCategory { name: String },
    AddFaq { faq: Faq },
}

impl PushAction {
    /// Action name as it appears on the wire, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            PushAction::AddVideo { .. } => "add_video",
            PushAction::DeleteVideo { .. } => "delete_video",
            PushAction::AddCategory { .. } => "add_category",
            PushAction::AddFaq { .. } => "add_faq",
        }
    }
}

/// HTTP implementation of [`CatalogBackend`].
pub struct RemoteGateway {
    url: String,
    default_category: String,
    client: reqwest::Client,
}

impl RemoteGateway {
    /// No request timeout is configured: the core does not support
    /// cancellation and accepts that the transport may hang.
    pub fn new(url: String, default_category: String) -> Self {
        Self {
            url,
            default_category,
            client: reqwest::Client::new(),
        }
    }

    fn query_url(&self, action: &str) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}action={}", self.url, sep, action)
    }
}

#[async_trait]
impl CatalogBackend for RemoteGateway {
    async fn fetch_videos(&self) -> Result<Vec<Video>> {
        let rows: Vec<WireVideo> = self
            .client
            .get(self.query_url("get_videos"))
            .send()
            .await
            .context("get_videos request failed")?
            .error_for_status()
            .context("get_videos returned an error status")?
            .json()
            .await
            .context("get_videos body was not a JSON video array")?;

        Ok(rows
            .into_iter()
            .filter_map(|row| normalize_video(row, &self.default_category))
            .collect())
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        let rows: Vec<WireCategory> = self
            .client
            .get(self.query_url("get_categories"))
            .send()
            .await
            .context("get_categories request failed")?
            .error_for_status()
            .context("get_categories returned an error status")?
            .json()
            .await
            .context("get_categories body was not a JSON category array")?;

        Ok(rows
            .into_iter()
            .map(|row| row.category)
            .filter(|c| !c.is_empty())
            .collect())
    }

    async fn push(&self, action: PushAction) -> std::result::Result<(), TransportError> {
        // Deliberately no error_for_status: the response is opaque.
        self.client.post(&self.url).json(&action).send().await?;
        Ok(())
    }
}

/// Raw video row as the backend serves it. Sheet-backed services are
/// loose with types, so `id` and `created` accept any JSON value.
#[derive(Debug, Deserialize)]
struct WireVideo {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    thumb: Option<String>,
    #[serde(default)]
    created: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    #[serde(default)]
    category: String,
}

/// Normalize one wire row into a [`Video`], or drop it.
///
/// Rows without a non-empty `title` and `link` are rejected; every other
/// field has a defined default.
fn normalize_video(row: WireVideo, default_category: &str) -> Option<Video> {
    let title = row.title.filter(|t| !t.is_empty())?;
    let link = row.link.filter(|l| !l.is_empty())?;

    let id = match row.id {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => new_id(),
    };
    let category = row
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_category.to_string());
    let thumb = row
        .thumb
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| thumbnail_from_link(&link));
    let created = match row.created {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(now_millis),
        Some(Value::String(s)) => s.parse().unwrap_or_else(|_| now_millis()),
        _ => now_millis(),
    };

    Some(Video {
        id,
        title,
        link,
        category,
        thumb,
        created,
    })
}
