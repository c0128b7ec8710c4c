//! Webhook endpoint handlers.
//!
//! - `GET /webhook`: subscription handshake, echoes the challenge
//! - `POST /webhook`: event notifications, replies to text messages
//! - `GET /health`: liveness probe

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::process::{extract_events, InboundEvent};
use crate::web::error::IntakeError;
use crate::web::signature::{
    is_signature_verification_enabled, verify_payload_signature, SIGNATURE_HEADER,
};
use crate::whatsapp::{Notification, Sender};
use crate::Config;

/// `hub.mode` value Meta sends when subscribing the endpoint.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sender: Sender,
}

impl AppState {
    pub fn new(config: Config, sender: Sender) -> Self {
        Self {
            config: Arc::new(config),
            sender,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Subscription Handshake
// =============================================================================

/// Query parameters of the verification request.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(default, rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(default, rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(default, rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Verification endpoint.
///
/// Echoes `hub.challenge` with 200 when the mode is `subscribe` and the token
/// matches the configured secret; anything else, including a query string that
/// doesn't parse, gets an empty 403.
pub async fn verify_webhook(
    State(state): State<AppState>,
    query: Result<Query<VerifyParams>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            warn!(error = %e, "webhook_verification_bad_query");
            return StatusCode::FORBIDDEN.into_response();
        }
    };

    let mode_ok = params.mode.as_deref() == Some(SUBSCRIBE_MODE);
    let token_ok = params.verify_token.as_deref() == Some(state.config.verify_token.as_str());

    info!(
        mode = ?params.mode,
        has_token = params.verify_token.is_some(),
        token_matches = token_ok,
        has_challenge = params.challenge.is_some(),
        "webhook_verification_received"
    );

    if mode_ok && token_ok {
        info!("webhook_verified");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        warn!(mode_ok = mode_ok, token_ok = token_ok, "webhook_verification_failed");
        StatusCode::FORBIDDEN.into_response()
    }
}

// =============================================================================
// Event Notifications
// =============================================================================

/// Notification endpoint.
///
/// This endpoint:
/// 1. Verifies the payload signature (if an app secret is configured)
/// 2. Parses the notification envelope
/// 3. Sends the acknowledgment to every text message sender
/// 4. Returns 200 OK
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, IntakeError> {
    info!(body_length = body.len(), "webhook_notification_received");
    debug!(payload = %String::from_utf8_lossy(&body), "webhook_notification_payload");

    if is_signature_verification_enabled(&state.config.app_secret) {
        let secret = state.config.app_secret.as_deref().unwrap_or_default();
        let header = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
        if !verify_payload_signature(secret, &body, header) {
            return Err(IntakeError::Signature);
        }
    }

    let notification: Notification = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "webhook_notification_parse_failed");
        IntakeError::from(e)
    })?;

    let events = extract_events(&notification);

    let mut replies = Vec::new();
    for event in &events {
        match event {
            InboundEvent::Text {
                from,
                body,
                message_id,
            } => {
                info!(
                    from = %from,
                    message_id = ?message_id,
                    text_length = body.as_ref().map(|b| b.len()).unwrap_or(0),
                    "text_message_received"
                );
                replies.push(state.sender.send_text(from, &state.config.reply_text));
            }
            InboundEvent::Unsupported { from, kind } => {
                info!(from = ?from, message_type = ?kind, "non_text_message_received");
            }
            InboundEvent::Status {
                id,
                status,
                recipient_id,
            } => {
                info!(
                    message_id = ?id,
                    status = ?status,
                    recipient_id = ?recipient_id,
                    "status_update_received"
                );
            }
        }
    }

    let attempted = replies.len();
    let sent = join_all(replies).await.into_iter().filter(|&ok| ok).count();

    info!(
        events = events.len(),
        replies_attempted = attempted,
        replies_sent = sent,
        "webhook_notification_processed"
    );

    Ok(StatusCode::OK)
}
