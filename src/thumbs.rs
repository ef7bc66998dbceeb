//! Thumbnail derivation.
//!
//! Given a video link, derive *some* image reference without ever touching
//! the network: recognized video-hosting URLs map to a predictable
//! identifier-based thumbnail URL, everything else gets a procedurally
//! synthesized SVG placeholder encoded as a data URI. The derivation is a
//! pure function of its input and never fails.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;

/// Derive a thumbnail reference for a video link.
///
/// YouTube links (`youtube.*` and `youtu.be` hosts) yield
/// `https://i.ytimg.com/vi/{id}/hqdefault.jpg`; anything else, including
/// unparseable links, yields the generic placeholder.
pub fn thumbnail_from_link(link: &str) -> String {
    match youtube_video_id(link) {
        Some(id) => format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
        None => placeholder_thumb("Preview"),
    }
}

/// Extract the video identifier from a YouTube-style link.
///
/// The identifier comes from the `v` query parameter when present,
/// otherwise from the last non-empty path segment (the `youtu.be/<id>`
/// short form).
pub fn youtube_video_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    if !host.contains("youtube") && !host.contains("youtu.be") {
        return None;
    }
    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        if !v.is_empty() {
            return Some(v.into_owned());
        }
    }
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Generic placeholder thumbnail with a short label.
pub fn placeholder_thumb(label: &str) -> String {
    svg_data_uri("#081028", "#777", 20, label)
}

/// Placeholder thumbnail for a category card without any videos.
pub fn category_thumb(category: &str) -> String {
    svg_data_uri("#0b1220", "#8fb", 28, category)
}

fn svg_data_uri(fill: &str, text_fill: &str, font_size: u32, label: &str) -> String {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='640' height='360'>\
         <rect width='100%' height='100%' fill='{}'/>\
         <text x='50%' y='50%' fill='{}' font-family='Arial' font-size='{}' \
         text-anchor='middle' dominant-baseline='middle'>{}</text></svg>",
        fill,
        text_fill,
        font_size,
        xml_escape(label)
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn xml_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&apos;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
