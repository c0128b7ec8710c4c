//! WhatsApp webhook relay.
//!
//! Receives WhatsApp Business notifications from Meta and answers every
//! inbound text message with a fixed acknowledgment.
//!
//! ## Architecture
//!
//! ```text
//! Meta → GET /webhook  → verify_webhook → challenge | 403
//! Meta → POST /webhook → receive_webhook → extract_events → Sender → Graph API
//! ```

pub mod config;
pub mod process;
pub mod web;
pub mod whatsapp;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use process::{extract_events, InboundEvent};
pub use web::{router, AppState};
pub use whatsapp::{Notification, OutboundTextMessage, Sender};
