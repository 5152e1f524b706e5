//! Robust low-price anomaly detection

pub mod detector;
pub mod stats;

pub use detector::{AnomalyDetector, DetectionRules};
