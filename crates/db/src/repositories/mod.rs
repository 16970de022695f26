//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` (or an open transaction) as the first argument.

pub mod attribute_repo;
pub mod conversation_item_repo;
pub mod conversation_repo;
pub mod conversation_status_repo;
pub mod conversation_view_repo;
pub mod event_repo;
pub mod search_document_repo;
pub mod tag_repo;
pub mod user_repo;

pub use attribute_repo::AttributeRepo;
pub use conversation_item_repo::ConversationItemRepo;
pub use conversation_repo::ConversationRepo;
pub use conversation_status_repo::{ConversationStatusRepo, RowLock};
pub use conversation_view_repo::ConversationViewRepo;
pub use event_repo::EventRepo;
pub use search_document_repo::SearchDocumentRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
