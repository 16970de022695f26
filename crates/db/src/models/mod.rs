//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for inserts and patches

pub mod attribute;
pub mod conversation;
pub mod conversation_item;
pub mod conversation_status;
pub mod conversation_view;
pub mod event;
pub mod search_document;
pub mod tag;
pub mod user;
