//! Event type names published on the event bus.
//!
//! Listeners (persistence, search indexer, WebSocket broadcaster) match on
//! these strings, so they must stay stable.

/// A batch of conversations changed status. Payload:
/// `{ "conversation_ids": [..], "conversations": [..] }`.
pub const CONVERSATIONS_UPDATED: &str = "conversations.updated";

/// A conversation was created. Payload: `{ "conversation_ids": [id] }`.
pub const CONVERSATION_CREATED: &str = "conversation.created";

/// An item was appended. Payload:
/// `{ "conversation_ids": [id], "item_id": id, "item_type": ".." }`.
pub const CONVERSATION_ITEM_CREATED: &str = "conversation.item_created";

/// Tags were attached or detached. Payload: `{ "conversation_ids": [id] }`.
pub const CONVERSATION_TAGS_CHANGED: &str = "conversation.tags_changed";

/// Custom attributes were written. Payload: `{ "conversation_ids": [id] }`.
pub const CONVERSATION_ATTRIBUTES_CHANGED: &str = "conversation.attributes_changed";

/// Every event type that affects a conversation's search document.
pub const REINDEX_EVENT_TYPES: &[&str] = &[
    CONVERSATIONS_UPDATED,
    CONVERSATION_CREATED,
    CONVERSATION_ITEM_CREATED,
    CONVERSATION_TAGS_CHANGED,
    CONVERSATION_ATTRIBUTES_CHANGED,
];

/// Entity type recorded as the event source for conversation events.
pub const ENTITY_CONVERSATION: &str = "conversation";
