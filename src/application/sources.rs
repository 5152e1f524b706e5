//! The url list input: a `url,name` csv consumed once per run, in file order.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::shared::types::WatchEntry;

#[derive(Debug, Deserialize)]
struct Row {
    url: String,
    #[serde(default)]
    name: String,
}

/// Reads the watchlist. An absent name falls back to the url itself; blank
/// rows are skipped. Failure here is fatal to the run: no URL has been
/// processed yet.
pub fn load_watchlist<P: AsRef<Path>>(path: P) -> Result<Vec<WatchEntry>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open url list {}", path.display()))?;

    let mut entries = Vec::new();
    for row in reader.deserialize::<Row>() {
        let row = row.with_context(|| format!("parse url list {}", path.display()))?;
        let url = row.url.trim().to_string();
        if url.is_empty() {
            continue;
        }
        let name = row.name.trim();
        let name = if name.is_empty() {
            url.clone()
        } else {
            name.to_string()
        };
        entries.push(WatchEntry { url, name });
    }
    Ok(entries)
}
