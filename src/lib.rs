//! Pricewatch - price-error watcher for e-commerce product pages
//! Built with Domain-Driven Design principles

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::monitor::Monitor;
pub use domain::anomaly::AnomalyDetector;
pub use domain::extraction::PriceExtractor;
