//! Stored custom attribute values.

use helpdesk_core::attribute::{Attribute, AttributeValue};
use helpdesk_core::types::DbId;
use serde::Deserialize;
use sqlx::FromRow;

/// A row from `conversation_attributes`.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationAttributeRow {
    pub conversation_id: DbId,
    pub key: String,
    pub value: serde_json::Value,
}

impl ConversationAttributeRow {
    /// Convert to the domain type. Rows holding a non-scalar value (written
    /// by hand, never by this service) are skipped.
    pub fn into_attribute(self) -> Option<Attribute> {
        let value = AttributeValue::from_json(&self.value)?;
        Some(Attribute {
            key: self.key,
            value,
        })
    }
}

/// DTO for `PUT /conversations/{id}/attributes`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAttributesRequest {
    pub attributes: Vec<Attribute>,
}
