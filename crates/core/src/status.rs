//! Conversation status categories.
//!
//! Every fine-grained status belongs to one coarse category. Categories are
//! stored as small integers, ordered so that a higher value means "more
//! open": `OPEN > PENDING > CLOSED > LOCKED`. Conversations cache their
//! status's category in `status_category` so inbox filters never need to
//! join the status table.

use serde::{Deserialize, Serialize};

/// Numeric encoding of [`StatusCategory::Open`].
pub const CATEGORY_OPEN: i16 = 4;

/// Numeric encoding of [`StatusCategory::Pending`].
pub const CATEGORY_PENDING: i16 = 3;

/// Numeric encoding of [`StatusCategory::Closed`].
pub const CATEGORY_CLOSED: i16 = 2;

/// Numeric encoding of [`StatusCategory::Locked`].
pub const CATEGORY_LOCKED: i16 = 1;

/// Coarse status tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum StatusCategory {
    Locked,
    Closed,
    Pending,
    Open,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 4] = [
        StatusCategory::Open,
        StatusCategory::Pending,
        StatusCategory::Closed,
        StatusCategory::Locked,
    ];

    /// Database/wire encoding.
    pub fn value(self) -> i16 {
        match self {
            StatusCategory::Open => CATEGORY_OPEN,
            StatusCategory::Pending => CATEGORY_PENDING,
            StatusCategory::Closed => CATEGORY_CLOSED,
            StatusCategory::Locked => CATEGORY_LOCKED,
        }
    }

    /// Decode a stored category value.
    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            CATEGORY_OPEN => Some(StatusCategory::Open),
            CATEGORY_PENDING => Some(StatusCategory::Pending),
            CATEGORY_CLOSED => Some(StatusCategory::Closed),
            CATEGORY_LOCKED => Some(StatusCategory::Locked),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusCategory::Open => "open",
            StatusCategory::Pending => "pending",
            StatusCategory::Closed => "closed",
            StatusCategory::Locked => "locked",
        }
    }
}

impl From<StatusCategory> for i16 {
    fn from(category: StatusCategory) -> Self {
        category.value()
    }
}

impl TryFrom<i16> for StatusCategory {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        StatusCategory::from_value(value).ok_or_else(|| invalid_category_message(value))
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a raw category value counts as closed.
///
/// Inclusive of `CLOSED`: locked conversations are closed too.
pub fn is_closed_value(category: i16) -> bool {
    category <= CATEGORY_CLOSED
}

/// Validate that a raw category value is one of the four known tiers.
pub fn validate_category(value: i16) -> Result<StatusCategory, String> {
    StatusCategory::try_from(value)
}

fn invalid_category_message(value: i16) -> String {
    format!(
        "Invalid status category {value}. Must be one of: {}",
        StatusCategory::ALL
            .iter()
            .map(|c| format!("{} ({})", c.value(), c.name()))
            .collect::<Vec<_>>()
            .join(", ")
    )
}
