//! Common types used across the application

/// One persisted price observation. Immutable once written; the price log
/// is append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub url: String,
    pub name: String,
    /// Epoch seconds.
    pub observed_at: i64,
    pub price: f64,
}

/// One dispatched alert, kept so repeat anomalies on the same url can be
/// deduplicated within the cooldown window.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub url: String,
    /// Epoch seconds.
    pub raised_at: i64,
    pub price: f64,
    pub message: String,
}

/// Outcome of judging one price against its history.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub is_anomaly: bool,
    pub message: String,
}

/// One row of the input url list.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub url: String,
    pub name: String,
}
