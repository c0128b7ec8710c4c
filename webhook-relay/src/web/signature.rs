//! Webhook payload signature verification.
//!
//! Meta signs every event notification with the app secret using HMAC-SHA256
//! and sends the digest as `X-Hub-Signature-256: sha256=<hex>`.
//! Reference: https://developers.facebook.com/docs/graph-api/webhooks/getting-started#event-notifications

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a webhook payload signature.
///
/// # Arguments
///
/// * `app_secret` - The Meta app secret
/// * `body` - The raw request body, exactly as received
/// * `header` - The value of the `X-Hub-Signature-256` header, if present
///
/// # Returns
///
/// `true` if the header holds a well-formed signature that matches the body.
pub fn verify_payload_signature(app_secret: &str, body: &[u8], header: Option<&str>) -> bool {
    let Some(header) = header else {
        warn!("webhook_signature_missing");
        return false;
    };

    let Some(hex_digest) = header.trim().strip_prefix(SIGNATURE_PREFIX) else {
        warn!(header_length = header.len(), "webhook_signature_bad_prefix");
        return false;
    };

    let provided = match hex::decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!("webhook_signature_not_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);

    // verify_slice compares in constant time
    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(
            body_length = body.len(),
            signature_length = provided.len(),
            "webhook_signature_mismatch"
        );
    }

    valid
}

/// Compute the header value Meta would send for `body`.
#[cfg(test)]
pub(crate) fn sign_payload(app_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes()).unwrap();
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Check if payload signature verification is enabled.
pub fn is_signature_verification_enabled(app_secret: &Option<String>) -> bool {
    app_secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}
