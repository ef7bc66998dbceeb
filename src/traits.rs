//! Extension seams for the catalog core.
//!
//! The [`CatalogBackend`] trait abstracts the remote persistence mirror so
//! the sync coordinator and the CRUD layer can be exercised against stub
//! backends in tests, while production wires in the HTTP gateway
//! ([`RemoteGateway`](crate::gateway::RemoteGateway)).
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             CatalogBackend              │
//! │   ┌───────────────┐  ┌──────────────┐   │
//! │   │ RemoteGateway │  │ Test stubs   │   │
//! │   │ (HTTP, JSON)  │  │ (in-memory)  │   │
//! │   └───────────────┘  └──────────────┘   │
//! └───────────────┬─────────────────────────┘
//!                 ▼
//!     sync coordinator / CRUD operations
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::gateway::{PushAction, TransportError};
use crate::models::Video;

/// Remote persistence mirror for the catalog.
///
/// # Contract
///
/// Fetches are request/response and may fail with ordinary errors. Pushes
/// are **fire-and-forget**: the transport cannot expose response bodies or
/// status codes, so [`push`](CatalogBackend::push) only ever reports a
/// call-level [`TransportError`], never a backend-side outcome. Every push
/// is therefore optimistic — the local store stays the source of truth for
/// the session and the backend is an eventually-consistent mirror that may
/// lag or silently drop writes.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch the authoritative video collection.
    ///
    /// Entries missing required fields are dropped and defaults are
    /// filled in during normalization; see the gateway wire rules.
    async fn fetch_videos(&self) -> Result<Vec<Video>>;

    /// Fetch the category registry.
    async fn fetch_categories(&self) -> Result<Vec<String>>;

    /// Send one mutation, best-effort.
    ///
    /// A returned `Ok(())` means the call left this process, nothing
    /// more. Callers must not treat it as remote confirmation and must
    /// not roll back local state on `Err`.
    async fn push(&self, action: PushAction) -> std::result::Result<(), TransportError>;
}
