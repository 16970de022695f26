//! Conversation item types and body storage rules.
//!
//! Messages and notes carry plain text; events and form submissions carry a
//! JSON document. The database keeps them in `body_text` / `body_json`, with
//! exactly one of the two populated.

use serde::{Deserialize, Serialize};

pub const ITEM_MESSAGE: &str = "message";
pub const ITEM_NOTE: &str = "note";
pub const ITEM_EVENT: &str = "event";
pub const ITEM_FORM_SUBMISSION: &str = "form_submission";

/// All valid item type values.
pub const VALID_ITEM_TYPES: &[&str] = &[ITEM_MESSAGE, ITEM_NOTE, ITEM_EVENT, ITEM_FORM_SUBMISSION];

/// Maximum length of a text body, in characters.
pub const MAX_TEXT_BODY_CHARS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Message,
    Note,
    Event,
    FormSubmission,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Message => ITEM_MESSAGE,
            ItemType::Note => ITEM_NOTE,
            ItemType::Event => ITEM_EVENT,
            ItemType::FormSubmission => ITEM_FORM_SUBMISSION,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ITEM_MESSAGE => Some(ItemType::Message),
            ITEM_NOTE => Some(ItemType::Note),
            ITEM_EVENT => Some(ItemType::Event),
            ITEM_FORM_SUBMISSION => Some(ItemType::FormSubmission),
            _ => None,
        }
    }

    /// Whether this type stores its body as JSON rather than text.
    pub fn has_json_body(self) -> bool {
        matches!(self, ItemType::Event | ItemType::FormSubmission)
    }
}

/// Only customer-visible messages are indexed for search.
pub fn should_be_searchable(item_type: ItemType) -> bool {
    item_type == ItemType::Message
}

/// Validated item body, ready to be split into storage columns.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemBody {
    Text(String),
    Json(serde_json::Value),
}

impl ItemBody {
    pub fn text(&self) -> Option<&str> {
        match self {
            ItemBody::Text(text) => Some(text),
            ItemBody::Json(_) => None,
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match self {
            ItemBody::Json(value) => Some(value),
            ItemBody::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemBodyError {
    #[error("{item_type} items require a text body")]
    ExpectedText { item_type: &'static str },

    #[error("{item_type} items require a JSON object body")]
    ExpectedJson { item_type: &'static str },

    #[error("Text body must not be empty")]
    EmptyText,

    #[error("Text body exceeds {MAX_TEXT_BODY_CHARS} characters")]
    TextTooLong,
}

/// Check an incoming body against the storage rule for `item_type`.
///
/// Text types accept a JSON string; JSON types accept a JSON object.
pub fn validate_body(
    item_type: ItemType,
    body: serde_json::Value,
) -> Result<ItemBody, ItemBodyError> {
    if item_type.has_json_body() {
        return match body {
            serde_json::Value::Object(_) => Ok(ItemBody::Json(body)),
            _ => Err(ItemBodyError::ExpectedJson {
                item_type: item_type.as_str(),
            }),
        };
    }

    let serde_json::Value::String(text) = body else {
        return Err(ItemBodyError::ExpectedText {
            item_type: item_type.as_str(),
        });
    };
    if text.trim().is_empty() {
        return Err(ItemBodyError::EmptyText);
    }
    if text.chars().count() > MAX_TEXT_BODY_CHARS {
        return Err(ItemBodyError::TextTooLong);
    }
    Ok(ItemBody::Text(text))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_round_trips_every_valid_type() {
        for value in VALID_ITEM_TYPES {
            assert_eq!(ItemType::parse(value).map(ItemType::as_str), Some(*value));
        }
        assert_eq!(ItemType::parse("reply"), None);
    }

    #[test]
    fn only_messages_are_searchable() {
        assert!(should_be_searchable(ItemType::Message));
        assert!(!should_be_searchable(ItemType::Note));
        assert!(!should_be_searchable(ItemType::Event));
        assert!(!should_be_searchable(ItemType::FormSubmission));
    }

    #[test]
    fn message_body_must_be_non_empty_text() {
        assert_eq!(
            validate_body(ItemType::Message, json!("hello")),
            Ok(ItemBody::Text("hello".into()))
        );
        assert_eq!(
            validate_body(ItemType::Note, json!("   ")),
            Err(ItemBodyError::EmptyText)
        );
        assert_eq!(
            validate_body(ItemType::Message, json!({"text": "hi"})),
            Err(ItemBodyError::ExpectedText { item_type: "message" })
        );
    }

    #[test]
    fn event_body_must_be_an_object() {
        let body = json!({"name": "assigned", "agent_id": 4});
        assert_eq!(
            validate_body(ItemType::Event, body.clone()),
            Ok(ItemBody::Json(body))
        );
        assert_eq!(
            validate_body(ItemType::FormSubmission, json!("text")),
            Err(ItemBodyError::ExpectedJson { item_type: "form_submission" })
        );
    }

    #[test]
    fn oversized_text_is_rejected() {
        let long = "a".repeat(MAX_TEXT_BODY_CHARS + 1);
        assert_eq!(
            validate_body(ItemType::Message, json!(long)),
            Err(ItemBodyError::TextTooLong)
        );
    }
}
