//! Core data models used throughout the catalog.
//!
//! These types represent the videos, FAQs, images, and sessions that flow
//! through the store, the remote gateway, and the render layer.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog video entry.
///
/// `id` is unique within the store and generated locally when absent.
/// `created` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub link: String,
    pub category: String,
    pub thumb: String,
    pub created: i64,
}

/// A frequently-asked question. Field names match the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub q: String,
    pub a: String,
}

/// An uploaded image, stored as a self-contained base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub id: String,
    pub name: String,
    pub data: String,
}

/// Logged-in role. Controls which operations and views are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

/// Current session, absent for guests. Survives between commands only
/// through the storage layer's session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub name: String,
}

/// User-supplied fields for a video create/update, before thumbnail
/// derivation and id/timestamp assignment.
#[derive(Debug, Clone)]
pub struct VideoDraft {
    pub title: String,
    pub link: String,
    pub category: String,
}

/// Generate a fresh unique id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
