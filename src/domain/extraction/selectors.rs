//! Visible-markup strategies: the per-site selector table and the generic
//! "anything called price" fallback.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::config::SiteCfg;

const GENERIC_SELECTORS: [&str; 2] = ["[class*=price]", "[id*=price]"];

/// Visible text of elements matched by the host's configured selectors.
/// Hosts match on domain suffix, so `www.fnac.com` hits the `fnac.com` row.
pub fn site_candidates(doc: &Html, host: &str, sites: &[SiteCfg]) -> Vec<String> {
    let mut out = Vec::new();
    for site in sites.iter().filter(|s| host_matches(host, &s.domain)) {
        for sel in &site.selectors {
            let Ok(selector) = Selector::parse(sel) else {
                warn!(selector = %sel, domain = %site.domain, "skipping invalid selector");
                continue;
            };
            out.extend(
                doc.select(&selector)
                    .map(visible_text)
                    .filter(|t| !t.is_empty()),
            );
        }
    }
    out
}

/// Last resort, independent of domain: any element whose class or id
/// loosely mentions "price".
pub fn generic_candidates(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for sel in GENERIC_SELECTORS {
        let Ok(selector) = Selector::parse(sel) else {
            continue;
        };
        out.extend(
            doc.select(&selector)
                .map(visible_text)
                .filter(|t| !t.is_empty()),
        );
    }
    out
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn visible_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
