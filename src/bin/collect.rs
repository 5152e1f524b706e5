//! Seeds the watchlist csv from the six sites' sitemaps.

use anyhow::{Context, Result};
use clap::Parser;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use pricewatch::config::Config;
use pricewatch::infrastructure::fetch::DocumentLoader;

struct Site {
    domain: &'static str,
    sitemap: &'static str,
    /// Product pages only; sitemap indexes also list category and blog urls.
    product_pattern: &'static str,
}

const SITES: [Site; 6] = [
    Site {
        domain: "alltricks.fr",
        sitemap: "https://www.alltricks.fr/sitemap.xml",
        product_pattern: r"(?i)/(p|produit|product|fiche)/",
    },
    Site {
        domain: "cdiscount.com",
        sitemap: "https://www.cdiscount.com/sitemap.xml",
        product_pattern: r"(?i)/(dp\.asp|prd/|\.html$)",
    },
    Site {
        domain: "leroymerlin.fr",
        sitemap: "https://www.leroymerlin.fr/sitemap.xml",
        product_pattern: r"(?i)/p-",
    },
    Site {
        domain: "ikea.com",
        sitemap: "https://www.ikea.com/sitemap.xml",
        product_pattern: r"(?i)/p/",
    },
    Site {
        domain: "fnac.com",
        sitemap: "https://www.fnac.com/sitemap.xml",
        product_pattern: r"(?i)/(a/|p/|ProductDetail)",
    },
    Site {
        domain: "boulanger.com",
        sitemap: "https://www.boulanger.com/sitemap.xml",
        product_pattern: r"(?i)/(ref|product|fiche-produit)",
    },
];

#[derive(Parser, Debug)]
#[command(version, about = "Collects product urls from site sitemaps into a watchlist csv")]
struct Args {
    /// Output csv path
    #[arg(long, default_value = "urls.csv")]
    out: String,

    /// Cap on collected urls per site
    #[arg(long, default_value = "150")]
    max_per_site: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();
    let args = Args::parse();

    let cfg = Config::default();
    let loader = DocumentLoader::new(
        &cfg.http.user_agent,
        Duration::from_secs(cfg.http.timeout_secs),
    )?;

    let mut all_urls = Vec::new();
    for site in SITES {
        let found = collect_site(&loader, &site, args.max_per_site).await?;
        info!("{}: {} urls", site.domain, found.len());
        all_urls.extend(found);
    }

    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("open output {}", args.out))?;
    writer.write_record(["url", "name"])?;
    let mut seen = HashSet::new();
    let mut written = 0usize;
    for url in all_urls {
        if seen.insert(url.clone()) {
            // no better name is known at collection time
            writer.write_record([url.as_str(), url.as_str()])?;
            written += 1;
        }
    }
    writer.flush()?;
    info!("wrote {} ({written} urls)", args.out);
    Ok(())
}

/// Capped walk of one site's sitemap tree: child sitemaps are queued,
/// product urls matched, the rest dropped. An unreachable or malformed
/// sitemap is skipped, never fatal.
async fn collect_site(loader: &DocumentLoader, site: &Site, cap: usize) -> Result<Vec<String>> {
    let product = Regex::new(site.product_pattern).context("product url pattern")?;

    let mut to_visit = vec![site.sitemap.to_string()];
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    while let Some(sitemap_url) = to_visit.pop() {
        if found.len() >= cap {
            break;
        }
        if !seen.insert(sitemap_url.clone()) {
            continue;
        }
        let xml = match loader.load(&sitemap_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("skipping sitemap {sitemap_url}: {e}");
                continue;
            }
        };
        for loc in sitemap_locs(&xml) {
            if loc.ends_with(".xml") {
                to_visit.push(loc);
            } else if product.is_match(&loc) {
                found.push(loc);
                if found.len() >= cap {
                    break;
                }
            }
        }
    }
    Ok(found)
}

/// All `<loc>` values of a sitemap or sitemap index, namespace ignored.
fn sitemap_locs(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut locs = Vec::new();
    let mut in_loc = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                if let Ok(text) = t.unescape() {
                    let text = text.trim();
                    if !text.is_empty() {
                        locs.push(text.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            // malformed sitemap: keep whatever parsed so far
            Err(_) => break,
            _ => {}
        }
    }
    locs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_locs_from_a_namespaced_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://www.fnac.com/a/123</loc></url>
              <url><loc> https://www.fnac.com/a/456 </loc></url>
            </urlset>"#;
        assert_eq!(
            sitemap_locs(xml),
            vec!["https://www.fnac.com/a/123", "https://www.fnac.com/a/456"]
        );
    }

    #[test]
    fn sitemap_index_children_are_plain_locs_too() {
        let xml = r#"<sitemapindex>
              <sitemap><loc>https://www.ikea.com/products-1.xml</loc></sitemap>
            </sitemapindex>"#;
        assert_eq!(sitemap_locs(xml), vec!["https://www.ikea.com/products-1.xml"]);
    }

    #[test]
    fn truncated_xml_keeps_earlier_locs() {
        let xml = "<urlset><url><loc>https://a.example/p/1</loc></url><url><loc>https://a";
        assert_eq!(sitemap_locs(xml), vec!["https://a.example/p/1"]);
    }

    #[test]
    fn product_patterns_match_expected_shapes() {
        let fnac = Regex::new(SITES[4].product_pattern).unwrap();
        assert!(fnac.is_match("https://www.fnac.com/a/19203847/casque"));
        assert!(!fnac.is_match("https://www.fnac.com/magazine/article"));

        let leroy = Regex::new(SITES[2].product_pattern).unwrap();
        assert!(leroy.is_match("https://www.leroymerlin.fr/produits/p-123.html"));
    }
}
