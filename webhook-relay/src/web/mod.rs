//! Web server module for the WhatsApp webhook.
//!
//! Both webhook routes share one path: `GET /webhook` answers Meta's
//! subscription handshake and `POST /webhook` receives event notifications.

pub mod error;
pub mod handlers;
pub mod signature;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use error::IntakeError;
pub use handlers::{
    health, receive_webhook, verify_webhook, AppState, HealthResponse, VerifyParams,
    SUBSCRIBE_MODE,
};
pub use signature::{is_signature_verification_enabled, verify_payload_signature};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
