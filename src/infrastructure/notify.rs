//! Alert dispatch over the Telegram bot API.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::shared::errors::DispatchError;

/// Outbound alert transport.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn dispatch(&self, text: &str) -> Result<(), DispatchError>;
}

#[async_trait]
impl<T: AlertSink + ?Sized> AlertSink for Arc<T> {
    async fn dispatch(&self, text: &str) -> Result<(), DispatchError> {
        (**self).dispatch(text).await
    }
}

/// Telegram `sendMessage` transport. Both secrets must be present in the
/// environment; otherwise the sink stays disabled and dispatch only logs
/// locally.
pub struct TelegramSink {
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl TelegramSink {
    pub fn from_env(client: reqwest::Client) -> Self {
        let token = std::env::var("TELEGRAM_TOKEN")
            .ok()
            .filter(|v| !v.is_empty());
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .filter(|v| !v.is_empty());
        let credentials = token.zip(chat_id);
        if credentials.is_none() {
            info!("telegram not configured, alerts will only be logged locally");
        }
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl AlertSink for TelegramSink {
    async fn dispatch(&self, text: &str) -> Result<(), DispatchError> {
        let Some((token, chat_id)) = &self.credentials else {
            info!("telegram not configured, skipping dispatch");
            return Ok(());
        };

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        let resp = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(15))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "disable_web_page_preview": true,
            }))
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, %body, "telegram rejected the alert");
            return Err(DispatchError::Status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_sink_is_a_noop() {
        let sink = TelegramSink {
            client: reqwest::Client::new(),
            credentials: None,
        };
        assert!(sink.dispatch("price anomaly").await.is_ok());
    }
}
