//! Digest delivery channels.

use analytics_core::{Error, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::digest::Digest;

/// Outbound channel for the rendered digest. The scheduler does not care
/// whether delivery goes to a mail relay, a webhook, or the log.
#[async_trait]
pub trait DigestSender: Send + Sync {
    async fn send(&self, digest: &Digest) -> Result<()>;
}

/// Writes the digest subject to the log instead of delivering it. Default
/// channel when no webhook is configured.
pub struct LogSender;

#[async_trait]
impl DigestSender for LogSender {
    async fn send(&self, digest: &Digest) -> Result<()> {
        info!(subject = %digest.subject, bytes = digest.html.len(), "Digest rendered (log channel)");
        Ok(())
    }
}

/// Posts the digest as JSON to a mail-relay webhook.
pub struct WebhookSender {
    http: reqwest::Client,
    url: String,
    recipient: String,
}

impl WebhookSender {
    pub fn new(http: reqwest::Client, url: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl DigestSender for WebhookSender {
    async fn send(&self, digest: &Digest) -> Result<()> {
        let payload = json!({
            "to": self.recipient,
            "subject": digest.subject,
            "html": digest.html,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::internal(format!("digest webhook failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::internal(format!(
                "digest webhook returned {}",
                response.status()
            )));
        }

        info!(recipient = %self.recipient, "Digest dispatched");
        Ok(())
    }
}
