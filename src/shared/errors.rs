//! Error handling for the application

use thiserror::Error;

/// Extraction-related errors
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("{0}: pricing requires the licensed Keepa API, not supported")]
    UnsupportedMarketplace(String),

    #[error("no number found in {0:?}")]
    NumberNotFound(String),

    #[error("no extraction strategy yielded a parseable price")]
    PriceNotFound,
}

/// Storage-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Notification transport errors
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("telegram request failed: {0}")]
    Transport(String),

    #[error("telegram returned status {0}")]
    Status(reqwest::StatusCode),
}
