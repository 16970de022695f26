//! Custom conversation attributes.
//!
//! Attributes are an explicit list of `key -> value` pairs. The search
//! projection spreads them into top-level document keys with the
//! [`SEARCH_KEY_PREFIX`] prefix; that is the only place keys are rewritten.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix applied to attribute keys in search documents.
pub const SEARCH_KEY_PREFIX: &str = "ca_";

/// Maximum attribute key length.
pub const MAX_KEY_LEN: usize = 64;

/// Maximum length of a text attribute value.
pub const MAX_TEXT_VALUE_LEN: usize = 2_000;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("valid regex"));

/// Scalar value of a custom attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    /// Kept as a JSON number so integers stay integers.
    Number(serde_json::Number),
    Text(String),
    Null,
}

impl AttributeValue {
    /// Convert a stored JSON value. Arrays and objects are not attribute
    /// values and come back as `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(AttributeValue::Null),
            serde_json::Value::Bool(b) => Some(AttributeValue::Bool(*b)),
            serde_json::Value::Number(n) => Some(AttributeValue::Number(n.clone())),
            serde_json::Value::String(s) => Some(AttributeValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttributeValue::Null => serde_json::Value::Null,
            AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
            AttributeValue::Number(n) => serde_json::Value::Number(n.clone()),
            AttributeValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// One custom attribute of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
}

/// Search document key for an attribute.
pub fn search_key(key: &str) -> String {
    format!("{SEARCH_KEY_PREFIX}{key}")
}

/// Validate an attribute key: lowercase ASCII letters, digits and `_`.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(format!(
            "Attribute key must be between 1 and {MAX_KEY_LEN} characters"
        ));
    }
    if !KEY_RE.is_match(key) {
        return Err(format!(
            "Invalid attribute key '{key}'. Use lowercase letters, digits and '_'"
        ));
    }
    Ok(())
}

/// Validate a full attribute list before it is written.
pub fn validate_attributes(attributes: &[Attribute]) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for attribute in attributes {
        validate_key(&attribute.key)?;
        if !seen.insert(attribute.key.as_str()) {
            return Err(format!("Duplicate attribute key '{}'", attribute.key));
        }
        if let AttributeValue::Text(text) = &attribute.value {
            if text.chars().count() > MAX_TEXT_VALUE_LEN {
                return Err(format!(
                    "Value of '{}' exceeds {MAX_TEXT_VALUE_LEN} characters",
                    attribute.key
                ));
            }
        }
    }
    Ok(())
}

/// Spread attributes into a search document map as `ca_<key>` entries.
pub fn merge_into_document(
    document: &mut serde_json::Map<String, serde_json::Value>,
    attributes: &[Attribute],
) {
    for attribute in attributes {
        document.insert(search_key(&attribute.key), attribute.value.to_json());
    }
}
