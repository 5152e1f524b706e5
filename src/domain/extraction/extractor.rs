//! Ordered-fallback price extraction.

use scraper::Html;

use crate::config::SiteCfg;
use crate::domain::extraction::{meta, numeric, selectors, structured};
use crate::shared::errors::ExtractError;

/// Turns fetched page content into one normalized price by trying every
/// strategy's candidates in flat priority order: structured data, then meta
/// tags, then the host's selector table, then the generic fallback. The
/// first candidate the numeric parser accepts wins; a better candidate
/// further down the list is never considered.
pub struct PriceExtractor {
    sites: Vec<SiteCfg>,
}

impl PriceExtractor {
    pub fn new(sites: Vec<SiteCfg>) -> Self {
        Self { sites }
    }

    pub fn extract(&self, body: &str, host: &str) -> Result<f64, ExtractError> {
        let doc = Html::parse_document(body);

        let mut candidates = structured::candidates(&doc);
        candidates.extend(meta::candidates(&doc));
        candidates.extend(selectors::site_candidates(&doc, host, &self.sites));
        candidates.extend(selectors::generic_candidates(&doc));

        candidates
            .iter()
            .find_map(|c| numeric::parse_decimal(c).ok())
            .ok_or(ExtractError::PriceNotFound)
    }
}

/// Amazon pricing needs the licensed Keepa API; fail before any fetch is
/// attempted.
pub fn guard_supported(host: &str) -> Result<(), ExtractError> {
    if host.contains("amazon.") {
        return Err(ExtractError::UnsupportedMarketplace(host.to_string()));
    }
    Ok(())
}

/// Lowercased host portion of a url, scheme and path stripped.
pub fn host_of(url: &str) -> String {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    trimmed
        .split('/')
        .next()
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}
