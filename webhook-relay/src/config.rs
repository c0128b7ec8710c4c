//! Configuration module for environment variable parsing.
//!
//! The three credentials the relay cannot run without are required; everything
//! else falls back to a default. A `.env` file is honoured by the binary before
//! this module reads the environment.

use std::env;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Default Graph API host.
pub const DEFAULT_GRAPH_API_URL: &str = "https://graph.facebook.com";

/// Default Graph API version segment.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v18.0";

/// Default acknowledgment sent back for every inbound text message.
pub const DEFAULT_REPLY_TEXT: &str =
    "Thanks for messaging Parul Plastic! We received your message.";

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret echoed by Meta during the subscription handshake
    pub verify_token: String,

    /// Bearer token for the Graph API
    pub whatsapp_token: String,

    /// Business phone number id that replies are sent from
    pub phone_number_id: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// App secret for `X-Hub-Signature-256` verification; unset disables the check
    pub app_secret: Option<String>,

    /// Graph API base URL
    pub graph_api_url: Url,

    /// Graph API version path segment, e.g. `v18.0`
    pub graph_api_version: String,

    /// Text of the automated acknowledgment
    pub reply_text: String,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let verify_token = required("VERIFY_TOKEN")?;
        let whatsapp_token = required("WHATSAPP_TOKEN")?;
        let phone_number_id = required("PHONE_NUMBER_ID")?;

        let port: u16 = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let raw_url = lookup("GRAPH_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GRAPH_API_URL.to_string());
        let graph_api_url = Url::parse(raw_url.trim()).map_err(|_| ConfigError::Invalid {
            name: "GRAPH_API_URL",
            value: raw_url.clone(),
        })?;

        let request_timeout_ms: u64 = match lookup("REQUEST_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    env_var = "REQUEST_TIMEOUT_MS",
                    value = %raw,
                    "Invalid timeout, using default"
                );
                10_000
            }),
            None => 10_000,
        };

        Ok(Config {
            verify_token,
            whatsapp_token,
            phone_number_id,
            port,
            app_secret: lookup("WHATSAPP_APP_SECRET").filter(|s| !s.trim().is_empty()),
            graph_api_url,
            graph_api_version: lookup("GRAPH_API_VERSION")
                .map(|v| v.trim().trim_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GRAPH_API_VERSION.to_string()),
            reply_text: lookup("REPLY_TEXT")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REPLY_TEXT.to_string()),
            request_timeout_ms,
        })
    }

    /// Full URL of the outbound messages endpoint for the configured number.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.graph_api_url.as_str().trim_end_matches('/'),
            self.graph_api_version,
            self.phone_number_id
        )
    }
}
