//! WhatsApp Cloud API payload types.
//!
//! This module defines:
//! - the inbound notification envelope Meta posts to the webhook
//! - the outbound text message body sent to the Graph API
//!
//! Every inbound field is optional. Meta adds fields freely and omits the ones
//! that don't apply to a given change, so nothing here rejects a partial payload.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// `object` value of notifications that belong to a WhatsApp Business Account.
pub const WHATSAPP_OBJECT: &str = "whatsapp_business_account";

/// `field` value of changes that carry messages or statuses.
pub const MESSAGES_FIELD: &str = "messages";

/// `messaging_product` value required on every outbound message.
pub const MESSAGING_PRODUCT: &str = "whatsapp";

/// `type` value of plain-text messages.
pub const TEXT_TYPE: &str = "text";

// =============================================================================
// Inbound Notification Types
// =============================================================================

/// Top-level webhook notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Option<Vec<Entry>>,
}

/// One business account entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Option<Vec<Change>>,
}

/// A single change notification within an entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

/// Body of a `messages` change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub messages: Option<Vec<InboundMessage>>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub statuses: Option<Vec<StatusUpdate>>,
}

/// A message sent by a user to the business number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    /// Sender's WhatsApp id (phone number)
    #[serde(default, deserialize_with = "lenient_field")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub timestamp: Option<String>,
    /// Message type: `text`, `image`, `audio`, ...
    #[serde(default, rename = "type", deserialize_with = "lenient_field")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub text: Option<TextContent>,
}

/// Content of a text message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextContent {
    #[serde(default, deserialize_with = "lenient_field")]
    pub body: Option<String>,
}

/// Delivery status of a message previously sent by the business.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    #[serde(default, deserialize_with = "lenient_field")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub recipient_id: Option<String>,
}

/// Deserialize an optional leaf field, treating a value of the wrong JSON type as absent.
fn lenient_field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }

    Ok(serde_json::from_value(raw)
        .map_err(|e| debug!(error = %e, "notification_field_ignored"))
        .ok())
}

/// Deserialize an optional array item by item, dropping items that don't fit `T`.
///
/// The array itself still has to be an array.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;

    Ok(raw.map(|items| {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(index = index, error = %e, "notification_item_skipped");
                    None
                }
            })
            .collect()
    }))
}

// =============================================================================
// Outbound Message Types
// =============================================================================

/// Text message body for `POST /{phone-number-id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundTextMessage {
    pub messaging_product: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: OutboundText,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundText {
    pub body: String,
}

impl OutboundTextMessage {
    /// Create a text message addressed to `to`.
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            messaging_product: MESSAGING_PRODUCT,
            to: to.into(),
            kind: TEXT_TYPE,
            text: OutboundText { body: body.into() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_full_shape() {
        let raw = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "WABA_ID",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {
                            "display_phone_number": "15550000000",
                            "phone_number_id": "123"
                        },
                        "contacts": [{ "profile": { "name": "Asha" }, "wa_id": "919800000000" }],
                        "messages": [{
                            "from": "919800000000",
                            "id": "wamid.abc",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": { "body": "hello" }
                        }]
                    }
                }]
            }]
        });

        let notification: Notification = serde_json::from_value(raw).unwrap();
        assert_eq!(notification.object.as_deref(), Some(WHATSAPP_OBJECT));

        let entries = notification.entry.unwrap_or_default();
        let changes = entries[0].changes.as_deref().unwrap_or_default();
        let value = changes[0].value.as_ref().unwrap();
        let message = &value.messages.as_deref().unwrap_or_default()[0];
        assert_eq!(message.from.as_deref(), Some("919800000000"));
        assert_eq!(message.kind.as_deref(), Some("text"));
        assert_eq!(
            message.text.as_ref().and_then(|t| t.body.as_deref()),
            Some("hello")
        );
    }

    #[test]
    fn test_notification_empty_object() {
        let notification: Notification = serde_json::from_str("{}").unwrap();
        assert!(notification.object.is_none());
        assert!(notification.entry.is_none());
    }

    #[test]
    fn test_notification_null_fields() {
        let notification: Notification =
            serde_json::from_str(r#"{"object": null, "entry": null}"#).unwrap();
        assert!(notification.entry.is_none());
    }

    #[test]
    fn test_notification_wrong_type_rejected() {
        let result: Result<Notification, _> =
            serde_json::from_str(r#"{"object": "whatsapp_business_account", "entry": "oops"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mistyped_fields_become_absent() {
        let value: ChangeValue = serde_json::from_value(json!({
            "messages": [
                { "from": "111", "type": "text", "text": { "body": "ok" } },
                { "from": "222", "type": "text", "timestamp": 1700000000, "text": { "body": 5 } },
                { "from": 333, "type": "text" },
                { "from": "444", "type": "text", "text": "not an object" },
                "not a message",
                { "from": "555", "type": ["text"] }
            ],
            "statuses": [{ "id": "wamid.1", "status": 7 }, 42]
        }))
        .unwrap();

        let messages = value.messages.unwrap();
        assert_eq!(messages.len(), 5);

        assert_eq!(messages[1].from.as_deref(), Some("222"));
        assert!(messages[1].timestamp.is_none());
        assert!(messages[1].text.as_ref().unwrap().body.is_none());
        assert!(messages[2].from.is_none());
        assert_eq!(messages[3].kind.as_deref(), Some("text"));
        assert!(messages[3].text.is_none());
        assert!(messages[4].kind.is_none());

        let statuses = value.statuses.unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].id.as_deref(), Some("wamid.1"));
        assert!(statuses[0].status.is_none());
    }

    #[test]
    fn test_messages_not_an_array_rejected() {
        let result: Result<ChangeValue, _> =
            serde_json::from_value(json!({ "messages": "oops" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_outbound_text_message_shape() {
        let message = OutboundTextMessage::new("919800000000", "Thanks!");
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(
            value,
            json!({
                "messaging_product": "whatsapp",
                "to": "919800000000",
                "type": "text",
                "text": { "body": "Thanks!" }
            })
        );
    }
}
