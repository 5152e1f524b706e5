//! Infrastructure layer - network, storage, and notification transports

pub mod fetch;
pub mod notify;
pub mod store;
