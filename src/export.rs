//! CSV export/import of the video collection.
//!
//! Column order is fixed: `id,title,link,category,thumb,created`. Export
//! quotes every cell and doubles embedded quotes; import is tolerant —
//! rows missing an `id` or `title` are skipped, and the remaining fields
//! fall back to the same defaults the remote fetch path uses.

use crate::models::{now_millis, Video};
use crate::thumbs::thumbnail_from_link;

pub const CSV_HEADER: &str = "id,title,link,category,thumb,created";

/// Serialize videos to CSV with a header row.
pub fn export_videos_csv(videos: &[Video]) -> String {
    let mut rows = Vec::with_capacity(videos.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for v in videos {
        let cells = [
            v.id.as_str(),
            v.title.as_str(),
            v.link.as_str(),
            v.category.as_str(),
            v.thumb.as_str(),
        ];
        let mut row: Vec<String> = cells.iter().map(|c| quote(c)).collect();
        row.push(quote(&v.created.to_string()));
        rows.push(row.join(","));
    }
    rows.join("\n")
}

/// Parse CSV text into videos, applying defaults for missing fields.
///
/// Only rows with a non-empty `id` and `title` are kept.
pub fn parse_videos_csv(text: &str, default_category: &str) -> Vec<Video> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = match lines.next() {
        Some(h) => h,
        None => return Vec::new(),
    };
    let columns: Vec<String> = split_csv_line(header)
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();

    fn field<'a>(columns: &[String], fields: &'a [String], name: &str) -> &'a str {
        columns
            .iter()
            .position(|c| c == name)
            .and_then(|i| fields.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    let mut videos = Vec::new();
    for line in lines {
        let fields = split_csv_line(line);

        let id = field(&columns, &fields, "id");
        let title = field(&columns, &fields, "title");
        if id.is_empty() || title.is_empty() {
            continue;
        }

        let link = field(&columns, &fields, "link").to_string();
        let category = match field(&columns, &fields, "category") {
            "" => default_category.to_string(),
            c => c.to_string(),
        };
        let thumb = match field(&columns, &fields, "thumb") {
            "" => thumbnail_from_link(&link),
            t => t.to_string(),
        };
        let created = field(&columns, &fields, "created")
            .parse()
            .unwrap_or_else(|_| now_millis());

        videos.push(Video {
            id: id.to_string(),
            title: title.to_string(),
            link,
            category,
            thumb,
            created,
        });
    }
    videos
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Split one CSV line into fields, honoring quoted cells and doubled
/// quote escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
