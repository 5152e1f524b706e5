use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::info;

use pricewatch::application::monitor::{AlertPolicy, Monitor, MonitorSettings};
use pricewatch::application::sources;
use pricewatch::config::{AlertPolicyCfg, Config};
use pricewatch::domain::anomaly::{AnomalyDetector, DetectionRules};
use pricewatch::domain::extraction::PriceExtractor;
use pricewatch::infrastructure::fetch::DocumentLoader;
use pricewatch::infrastructure::notify::TelegramSink;
use pricewatch::infrastructure::store::SqliteStore;

#[derive(Parser, Debug)]
#[command(version, about = "Periodic price-error check over a watchlist of product pages")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Url list to check (overrides config)
    #[arg(long)]
    urls: Option<String>,

    /// Database location (overrides config)
    #[arg(long)]
    database: Option<String>,

    /// Dispatch on every anomalous check instead of cooldown gating
    #[arg(long)]
    always_alert: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();
    let args = Args::parse();

    // CLI args > config file > defaults
    let mut cfg = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(urls) = args.urls {
        cfg.urls_file = urls;
    }
    if let Some(database) = args.database {
        cfg.storage.database_url = database;
    }
    if args.always_alert {
        cfg.alerts.policy = AlertPolicyCfg::Always;
    }

    // Both are fatal before any url is processed; everything after this
    // point is isolated per url.
    let entries = sources::load_watchlist(&cfg.urls_file)?;
    info!("loaded {} urls from {}", entries.len(), cfg.urls_file);
    let store = SqliteStore::connect(&cfg.storage.database_url)
        .await
        .context("initialize price database")?;

    let loader = DocumentLoader::new(
        &cfg.http.user_agent,
        Duration::from_secs(cfg.http.timeout_secs),
    )?;
    let sink = TelegramSink::from_env(reqwest::Client::new());
    let extractor = PriceExtractor::new(cfg.sites.clone());
    let detector = AnomalyDetector::new(DetectionRules {
        abs_floor: cfg.detection.abs_floor,
        min_points: cfg.detection.min_points,
        rel_factor: cfg.detection.rel_factor,
    });
    let policy = match cfg.alerts.policy {
        AlertPolicyCfg::Cooldown => AlertPolicy::Cooldown {
            hours: cfg.alerts.cooldown_hours,
        },
        AlertPolicyCfg::Always => AlertPolicy::Always,
    };

    let monitor = Monitor::new(
        loader,
        extractor,
        detector,
        store,
        sink,
        MonitorSettings {
            window_days: cfg.detection.window_days,
            policy,
        },
    );

    let summary = monitor.run(&entries).await;
    info!(
        "checked {} urls: {} anomalies, {} failures",
        summary.checked, summary.anomalies, summary.failures
    );
    Ok(())
}
