//! Request-scoped intake errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure while accepting a webhook notification.
///
/// Every variant answers with an empty body; the detail goes to the log.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Signature header missing or not matching the body
    #[error("webhook signature rejected")]
    Signature,

    /// Body is not JSON or does not fit the notification shape
    #[error("webhook payload could not be parsed: {0}")]
    Payload(#[from] serde_json::Error),
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = match &self {
            IntakeError::Signature => StatusCode::UNAUTHORIZED,
            IntakeError::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        status.into_response()
    }
}
