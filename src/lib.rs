//! # Vision Catalog
//!
//! A local-first catalog manager for educational video libraries.
//!
//! The catalog core keeps an in-memory store of videos, categories, FAQs,
//! and images, persists it locally in SQLite, and mirrors mutations
//! best-effort to an optional remote backend whose responses are opaque
//! by design. Every mutation flows through one CRUD layer and ends in a
//! single render fan-out.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌─────────────┐
//! │ CLI / caller │──▶│    CRUD      │──▶│   Catalog   │
//! │   (vcat)     │   │ (CatalogApp)│   │    Store    │
//! └──────────────┘   └──────┬──────┘   └──────┬──────┘
//!                           │                 │
//!                 fire-and-forget          snapshot
//!                           ▼                 ▼
//!                    ┌─────────────┐   ┌─────────────┐
//!                    │   Remote    │   │   Render    │
//!                    │   Gateway   │   │   fan-out   │
//!                    └─────────────┘   └─────────────┘
//! ```
//!
//! On startup the sync coordinator fetches the authoritative video set
//! from the remote (at most one outstanding fetch, once per session),
//! replaces the store wholesale, and pulls the category registry. All
//! pushes are optimistic: the local store is the visible truth and the
//! remote is an eventually-consistent mirror.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`store`] | In-memory catalog store and category derivation |
//! | [`sync`] | Load state machine and demo seeding |
//! | [`ops`] | CRUD operations and the render fan-out |
//! | [`gateway`] | Remote backend HTTP client |
//! | [`traits`] | Backend seam for tests and alternate transports |
//! | [`thumbs`] | Pure thumbnail derivation |
//! | [`images`] | Image batch decoding |
//! | [`export`] | CSV export/import |
//! | [`render`] | Render view assembly and renderer seam |
//! | [`session`] | Static-credential login |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`persist`] | Fixed-key persisted state |

pub mod config;
pub mod db;
pub mod export;
pub mod gateway;
pub mod images;
pub mod migrate;
pub mod models;
pub mod ops;
pub mod persist;
pub mod render;
pub mod session;
pub mod store;
pub mod sync;
pub mod thumbs;
pub mod traits;
