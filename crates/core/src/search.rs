//! Search read-model constants and query helpers.
//!
//! The search document of a conversation is a flat JSON object. Timestamp
//! fields are always present: either integer epoch seconds or the
//! [`NULL_SENTINEL`] string, so the index schema sees one key set for every
//! document. Readers must treat the sentinel as "no value".

use crate::types::Timestamp;

/// Placeholder stored for absent timestamps.
pub const NULL_SENTINEL: &str = "_null";

/// At most this many message sub-documents are embedded per conversation.
pub const MAX_INDEXED_MESSAGES: usize = 50;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const MAX_SEARCH_LIMIT: i64 = 100;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

pub const DEFAULT_FEED_LIMIT: i64 = 30;
pub const MAX_FEED_LIMIT: i64 = 100;

/// Epoch seconds, or the sentinel string when the timestamp is absent.
pub fn epoch_or_null(ts: Option<Timestamp>) -> serde_json::Value {
    match ts {
        Some(ts) => serde_json::Value::from(ts.timestamp()),
        None => serde_json::Value::from(NULL_SENTINEL),
    }
}

/// Split user input into alphanumeric terms; `None` when nothing usable remains.
fn sanitize_terms(query: &str) -> Option<Vec<String>> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Build a PostgreSQL `tsquery` that ANDs every term and prefix-matches the
/// last one, so `"refund ord"` finds "refund order".
///
/// ```
/// use helpdesk_core::search::build_prefix_tsquery;
/// assert_eq!(build_prefix_tsquery("refund ord"), Some("refund & ord:*".to_string()));
/// assert_eq!(build_prefix_tsquery("  !! "), None);
/// ```
pub fn build_prefix_tsquery(query: &str) -> Option<String> {
    let terms = sanitize_terms(query)?;
    let (last, exact) = terms.split_last()?;
    if exact.is_empty() {
        Some(format!("{last}:*"))
    } else {
        Some(format!("{} & {last}:*", exact.join(" & ")))
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn absent_timestamp_becomes_sentinel() {
        assert_eq!(epoch_or_null(None), serde_json::json!("_null"));
    }

    #[test]
    fn present_timestamp_becomes_epoch_seconds() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let value = epoch_or_null(Some(ts));
        assert_eq!(value.as_i64(), Some(ts.timestamp()));
    }

    #[test]
    fn tsquery_strips_punctuation_and_prefixes_last_term() {
        assert_eq!(build_prefix_tsquery("hello"), Some("hello:*".to_string()));
        assert_eq!(
            build_prefix_tsquery("can't log-in!"),
            Some("cant & login:*".to_string())
        );
        assert_eq!(build_prefix_tsquery(""), None);
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(1_000), 20, 100), 100);
        assert_eq!(clamp_offset(Some(-4)), 0);
    }
}
