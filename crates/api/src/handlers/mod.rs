pub mod attribute;
pub mod conversation;
pub mod conversation_item;
pub mod search;
pub mod status;
pub mod tag;
pub mod view;
