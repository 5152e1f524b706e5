//! Document retrieval: network GET, or file-scheme read for local fixtures.

use std::time::Duration;

use crate::shared::errors::ExtractError;

/// Fetches page content with an identifying client header and a bounded
/// per-request timeout.
pub struct DocumentLoader {
    client: reqwest::Client,
}

impl DocumentLoader {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Loads a document body. `file://` references are read straight from
    /// disk so extraction can run against local fixtures; anything else is
    /// fetched over the network. Timeouts and non-success statuses surface
    /// as fetch errors, distinct from extraction failures.
    pub async fn load(&self, url: &str) -> Result<String, ExtractError> {
        if let Some(path) = url.strip_prefix("file://") {
            return tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ExtractError::Fetch(format!("read {path}: {e}")));
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| ExtractError::Fetch(e.to_string()))?;

        resp.text()
            .await
            .map_err(|e| ExtractError::Fetch(e.to_string()))
    }
}
