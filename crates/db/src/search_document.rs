//! Build the flat search document for a conversation.
//!
//! [`build_search_document`] is total: relations the caller did not load
//! render as `null` or empty lists.

use helpdesk_core::attribute::merge_into_document;
use helpdesk_core::item::{should_be_searchable, ItemType};
use helpdesk_core::search::{epoch_or_null, MAX_INDEXED_MESSAGES};
use serde_json::{json, Map, Value};

use crate::models::conversation::ConversationWithRelations;
use crate::models::conversation_item::ConversationItem;

/// Flatten a conversation and its relations into a JSON object.
pub fn build_search_document(source: &ConversationWithRelations) -> Value {
    let c = &source.conversation;
    let mut doc = Map::new();

    doc.insert("id".into(), json!(c.id));
    doc.insert("subject".into(), json!(c.subject));
    doc.insert("user_id".into(), json!(c.user_id));
    doc.insert("status_id".into(), json!(c.status_id));
    doc.insert("status_category".into(), json!(c.status_category));
    doc.insert("assignee_id".into(), json!(c.assignee_id));
    doc.insert("group_id".into(), json!(c.group_id));
    doc.insert("closed_by".into(), json!(c.closed_by));
    doc.insert("closed_at".into(), epoch_or_null(c.closed_at));
    doc.insert("created_at".into(), epoch_or_null(Some(c.created_at)));
    doc.insert("updated_at".into(), epoch_or_null(Some(c.updated_at)));

    let messages: Vec<Value> = indexed_messages(&source.messages)
        .map(message_document)
        .collect();
    doc.insert("messages".into(), Value::Array(messages));

    doc.insert("tags".into(), json!(source.tag_ids));

    doc.insert(
        "user".into(),
        source
            .user
            .as_ref()
            .map(|u| json!({ "id": u.id, "name": u.name, "email": u.email }))
            .unwrap_or(Value::Null),
    );
    doc.insert(
        "group".into(),
        source
            .group
            .as_ref()
            .map(|g| json!({ "id": g.id, "name": g.name }))
            .unwrap_or(Value::Null),
    );

    merge_into_document(&mut doc, &source.attributes);

    Value::Object(doc)
}

/// Plain text fed to `to_tsvector`: the subject followed by indexed
/// message bodies.
pub fn search_text(source: &ConversationWithRelations) -> String {
    let mut text = source.conversation.subject.clone();
    for message in indexed_messages(&source.messages) {
        if let Some(body) = &message.body_text {
            text.push('\n');
            text.push_str(body);
        }
    }
    text
}

/// Whether an item row belongs in the search index.
pub fn is_searchable_item(item: &ConversationItem) -> bool {
    ItemType::parse(&item.item_type).is_some_and(should_be_searchable)
}

fn indexed_messages(items: &[ConversationItem]) -> impl Iterator<Item = &ConversationItem> {
    items
        .iter()
        .filter(|item| is_searchable_item(item))
        .take(MAX_INDEXED_MESSAGES)
}

fn message_document(item: &ConversationItem) -> Value {
    json!({
        "id": item.id,
        "uuid": item.uuid,
        "body": item.body_text,
        "author_id": item.author_id,
        "created_at": item.created_at.timestamp(),
    })
}
