//! Domain layer - core business logic and entities

pub mod anomaly;
pub mod extraction;
