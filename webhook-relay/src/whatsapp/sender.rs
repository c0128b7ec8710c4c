//! Outbound message sending via the WhatsApp Cloud API.
//!
//! One authenticated POST per reply. Failures are logged and swallowed: the
//! inbound webhook is acknowledged regardless of whether the reply went out.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use tracing::{error, info};

use super::types::OutboundTextMessage;
use crate::config::Config;

/// Graph API client bound to one business phone number.
#[derive(Clone)]
pub struct Sender {
    client: Client,
    messages_url: String,
    token: String,
}

impl Sender {
    /// Build a sender from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            messages_url: config.messages_url(),
            token: config.whatsapp_token.clone(),
        })
    }

    /// Endpoint replies are posted to.
    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    /// Send a text message, logging the outcome.
    ///
    /// Returns whether the API accepted the message. Callers on the webhook
    /// path ignore the result.
    pub async fn send_text(&self, to: &str, text: &str) -> bool {
        info!(to = to, text_length = text.len(), "reply_send_starting");

        match self.post_text(to, text).await {
            Ok(status) => {
                info!(to = to, status_code = status.as_u16(), "reply_send_complete");
                true
            }
            Err(e) => {
                error!(to = to, error = %format!("{e:#}"), "reply_send_failed");
                false
            }
        }
    }

    async fn post_text(&self, to: &str, text: &str) -> Result<StatusCode> {
        let payload = OutboundTextMessage::new(to, text);

        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .context("WhatsApp API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("WhatsApp API returned {status}: {body}");
        }

        Ok(status)
    }
}
