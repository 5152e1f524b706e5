//! Application layer - use cases and services

pub mod monitor;
pub mod sources;

pub use monitor::{AlertPolicy, Monitor, MonitorSettings, RunSummary};
