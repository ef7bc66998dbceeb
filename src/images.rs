//! Image upload decoding.
//!
//! Files are read and embedded as self-contained base64 data URIs so the
//! render layer never needs filesystem access. A batch is all-or-nothing:
//! if any file in the batch fails to read, the whole batch is rejected
//! with one aggregate error and nothing is appended.

use std::path::{Path, PathBuf};

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::models::{new_id, ImageAsset};

/// Map a file name to the media type used in its data URI.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Decode a batch of image files into [`ImageAsset`]s.
///
/// All reads must succeed before anything is returned; a partial failure
/// aborts the batch and reports every failed path in one error.
pub async fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageAsset>> {
    let mut assets = Vec::with_capacity(paths.len());
    let mut failures: Vec<String> = Vec::new();

    for path in paths {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("image")
                    .to_string();
                let data = format!(
                    "data:{};base64,{}",
                    content_type_for(&name),
                    STANDARD.encode(&bytes)
                );
                assets.push(ImageAsset {
                    id: new_id(),
                    name,
                    data,
                });
            }
            Err(err) => failures.push(format!("{}: {}", path.display(), err)),
        }
    }

    if !failures.is_empty() {
        anyhow::bail!(
            "image batch rejected, {} of {} file(s) failed:\n  {}",
            failures.len(),
            paths.len(),
            failures.join("\n  ")
        );
    }

    Ok(assets)
}
