//! The batch pass: fetch, extract, persist, judge, alert.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::anomaly::AnomalyDetector;
use crate::domain::extraction::{guard_supported, host_of, PriceExtractor};
use crate::infrastructure::fetch::DocumentLoader;
use crate::infrastructure::notify::AlertSink;
use crate::infrastructure::store::PriceStore;
use crate::shared::types::{AlertRecord, PricePoint, Verdict, WatchEntry};

/// When a detected anomaly may actually be sent out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPolicy {
    /// At most one dispatch per url within the cooldown window.
    Cooldown { hours: i64 },
    /// Dispatch on every anomalous check.
    Always,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Trailing look-back for the history window, in days.
    pub window_days: i64,
    pub policy: AlertPolicy,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub anomalies: usize,
    pub failures: usize,
}

/// Sequential single-writer pass over the watchlist. One broken page never
/// aborts the batch; every url gets a result line.
pub struct Monitor<S, N> {
    loader: DocumentLoader,
    extractor: PriceExtractor,
    detector: AnomalyDetector,
    store: S,
    sink: N,
    settings: MonitorSettings,
}

impl<S: PriceStore, N: AlertSink> Monitor<S, N> {
    pub fn new(
        loader: DocumentLoader,
        extractor: PriceExtractor,
        detector: AnomalyDetector,
        store: S,
        sink: N,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            loader,
            extractor,
            detector,
            store,
            sink,
            settings,
        }
    }

    pub async fn run(&self, entries: &[WatchEntry]) -> RunSummary {
        let mut summary = RunSummary::default();
        for entry in entries {
            summary.checked += 1;
            match self.check_one(entry).await {
                Ok(verdict) => {
                    if verdict.is_anomaly {
                        summary.anomalies += 1;
                    }
                }
                Err(e) => {
                    summary.failures += 1;
                    warn!("❌ {} | {} | {e:#}", entry.name, entry.url);
                }
            }
        }
        info!(
            checked = summary.checked,
            anomalies = summary.anomalies,
            failures = summary.failures,
            "run complete"
        );
        summary
    }

    async fn check_one(&self, entry: &WatchEntry) -> Result<Verdict> {
        let host = host_of(&entry.url);
        guard_supported(&host)?;

        let body = self.loader.load(&entry.url).await?;
        let price = self.extractor.extract(&body, &host)?;

        self.store
            .append_price(&PricePoint {
                url: entry.url.clone(),
                name: entry.name.clone(),
                observed_at: Utc::now().timestamp(),
                price,
            })
            .await?;

        // The detector judges against strictly prior knowledge: the point
        // just written sits last in the window and is dropped.
        let mut window = self
            .store
            .window_for(&entry.url, self.settings.window_days)
            .await?;
        window.pop();

        let verdict = self.detector.detect(price, &window);
        let line = format!(
            "{} | {price:.2} | {} | {}",
            entry.name, verdict.message, entry.url
        );
        if verdict.is_anomaly {
            let line = format!("⚠️ {line}");
            warn!("{line}");
            self.raise_alert(&entry.url, price, &verdict.message, &line)
                .await?;
        } else {
            info!("✅ {line}");
        }
        Ok(verdict)
    }

    async fn raise_alert(&self, url: &str, price: f64, message: &str, line: &str) -> Result<()> {
        if let AlertPolicy::Cooldown { hours } = self.settings.policy {
            if self.store.has_recent_alert(url, hours).await? {
                info!("alert suppressed, one already raised within the last {hours}h: {url}");
                return Ok(());
            }
        }

        // The price point and verdict are already committed; a refused
        // dispatch is logged and the ledger row still counts against the
        // cooldown.
        if let Err(e) = self
            .sink
            .dispatch(&format!("Price anomaly detected\n{line}"))
            .await
        {
            warn!("alert dispatch failed for {url}: {e}");
        }

        self.store
            .append_alert(&AlertRecord {
                url: url.to_string(),
                raised_at: Utc::now().timestamp(),
                price,
                message: message.to_string(),
            })
            .await?;
        Ok(())
    }
}
