//! Notification processing module.
//!
//! Walks the nested webhook envelope and flattens it into a list of events
//! the web layer acts on.
//!
//! ## Processing Flow
//!
//! ```text
//! Notification → entry[] → changes[] (field = "messages")
//!              → messages[] | statuses[] → InboundEvent
//! ```
//!
//! Missing or empty arrays at any level are skipped, never treated as errors.

use tracing::{debug, info, warn};

use crate::whatsapp::{
    ChangeValue, InboundMessage, Notification, MESSAGES_FIELD, TEXT_TYPE, WHATSAPP_OBJECT,
};

/// Something a notification told us about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A plain-text message that should be acknowledged.
    Text {
        from: String,
        body: Option<String>,
        message_id: Option<String>,
    },
    /// A message of any other type. Logged only.
    Unsupported {
        from: Option<String>,
        kind: Option<String>,
    },
    /// Delivery status for a message the business sent. Logged only.
    Status {
        id: Option<String>,
        status: Option<String>,
        recipient_id: Option<String>,
    },
}

/// Flatten a notification into events.
///
/// Returns an empty list when `object` is not a WhatsApp Business Account.
pub fn extract_events(notification: &Notification) -> Vec<InboundEvent> {
    if notification.object.as_deref() != Some(WHATSAPP_OBJECT) {
        info!(object = ?notification.object, "notification_ignored_object");
        return Vec::new();
    }

    let mut events = Vec::new();

    let changes = notification
        .entry
        .iter()
        .flatten()
        .flat_map(|entry| entry.changes.iter().flatten());

    for change in changes {
        if change.field.as_deref() != Some(MESSAGES_FIELD) {
            debug!(field = ?change.field, "change_ignored_field");
            continue;
        }

        match &change.value {
            Some(value) => collect_value(value, &mut events),
            None => warn!("change_missing_value"),
        }
    }

    events
}

fn collect_value(value: &ChangeValue, events: &mut Vec<InboundEvent>) {
    let messages = value.messages.as_deref().unwrap_or_default();
    let statuses = value.statuses.as_deref().unwrap_or_default();

    if !messages.is_empty() {
        events.extend(messages.iter().filter_map(classify_message));
    } else if !statuses.is_empty() {
        events.extend(statuses.iter().map(|s| InboundEvent::Status {
            id: s.id.clone(),
            status: s.status.clone(),
            recipient_id: s.recipient_id.clone(),
        }));
    } else {
        warn!(
            messaging_product = ?value.messaging_product,
            "change_without_messages_or_statuses"
        );
    }
}

fn classify_message(message: &InboundMessage) -> Option<InboundEvent> {
    if message.kind.as_deref() != Some(TEXT_TYPE) {
        return Some(InboundEvent::Unsupported {
            from: message.from.clone(),
            kind: message.kind.clone(),
        });
    }

    let Some(from) = message.from.clone() else {
        warn!(message_id = ?message.id, "text_message_without_sender");
        return None;
    };

    Some(InboundEvent::Text {
        from,
        body: message.text.as_ref().and_then(|t| t.body.clone()),
        message_id: message.id.clone(),
    })
}
