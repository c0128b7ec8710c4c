//! WhatsApp Cloud API integration.
//!
//! - `types`: inbound notification envelope and outbound message body
//! - `sender`: Graph API client used to send replies

pub mod sender;
pub mod types;

pub use sender::Sender;
pub use types::{
    Change, ChangeValue, Entry, InboundMessage, Notification, OutboundTextMessage, StatusUpdate,
    TextContent, MESSAGES_FIELD, TEXT_TYPE, WHATSAPP_OBJECT,
};
