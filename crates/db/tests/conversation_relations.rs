//! Integration tests for item feeds, predicate listing, relation loading and
//! the stored search read model.

use helpdesk_core::attribute::{Attribute, AttributeValue};
use helpdesk_core::item::{ItemBody, ItemType};
use helpdesk_core::predicate;
use helpdesk_core::search::build_prefix_tsquery;
use helpdesk_core::status::StatusCategory;
use helpdesk_core::types::{Actor, DbId};
use helpdesk_core::view::OrderDir;
use helpdesk_db::models::conversation::CreateConversation;
use helpdesk_db::repositories::{
    AttributeRepo, ConversationItemRepo, ConversationRepo, ConversationStatusRepo,
    SearchDocumentRepo, TagRepo,
};
use helpdesk_db::search_document::{build_search_document, search_text};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, role) VALUES ($1, $2, 'customer') RETURNING id",
    )
    .bind(name)
    .bind(format!("{}@example.com", name.to_lowercase()))
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_group(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO groups (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn create(
    pool: &PgPool,
    subject: &str,
    user_id: Option<DbId>,
    group_id: Option<DbId>,
) -> DbId {
    let status = ConversationStatusRepo::default_for_category(pool, StatusCategory::Open)
        .await
        .unwrap()
        .unwrap();
    let input = CreateConversation {
        subject: subject.to_string(),
        user_id,
        assignee_id: None,
        group_id,
        status_id: None,
    };
    ConversationRepo::create(pool, &input, &status, Actor::System)
        .await
        .unwrap()
        .id
}

async fn message(pool: &PgPool, conversation_id: DbId, text: &str) -> DbId {
    ConversationItemRepo::create(
        pool,
        conversation_id,
        ItemType::Message,
        None,
        &ItemBody::Text(text.to_string()),
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Item feed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_pages_backwards(pool: PgPool) {
    let id = create(&pool, "Chatty", None, None).await;
    let mut ids = Vec::new();
    for n in 0..5 {
        ids.push(message(&pool, id, &format!("message {n}")).await);
    }

    let first = ConversationItemRepo::list_page(&pool, id, None, Some(2))
        .await
        .unwrap();
    let first_ids: Vec<DbId> = first.items.iter().map(|i| i.id).collect();
    assert_eq!(first_ids, vec![ids[3], ids[4]]);
    assert!(first.has_more);
    assert_eq!(first.next_before, Some(ids[3]));

    let second = ConversationItemRepo::list_page(&pool, id, first.next_before, Some(2))
        .await
        .unwrap();
    let second_ids: Vec<DbId> = second.items.iter().map(|i| i.id).collect();
    assert_eq!(second_ids, vec![ids[1], ids[2]]);
    assert!(second.has_more);

    let last = ConversationItemRepo::list_page(&pool, id, second.next_before, Some(2))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].id, ids[0]);
    assert!(!last.has_more);
    assert_eq!(last.next_before, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_json_body_item_is_stored_as_json(pool: PgPool) {
    let id = create(&pool, "Form", None, None).await;
    let item = ConversationItemRepo::create(
        &pool,
        id,
        ItemType::FormSubmission,
        None,
        &ItemBody::Json(json!({ "rating": 5 })),
    )
    .await
    .unwrap();

    assert_eq!(item.item_type, "form_submission");
    assert!(item.body_text.is_none());
    assert_eq!(item.body_json, Some(json!({ "rating": 5 })));
}

// ---------------------------------------------------------------------------
// Predicate listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_group_tag_and_subject(pool: PgPool) {
    let billing = seed_group(&pool, "Billing").await;
    let a = create(&pool, "Refund request", None, Some(billing)).await;
    let b = create(&pool, "Refund status", None, None).await;
    let _c = create(&pool, "Login issue", None, Some(billing)).await;

    let urgent = TagRepo::create_or_get(&pool, "Urgent").await.unwrap();
    TagRepo::attach(&pool, b, urgent.id).await.unwrap();

    let in_billing = ConversationRepo::list(
        &pool,
        &[predicate::in_group(billing), predicate::subject_contains("refund")],
        "id",
        OrderDir::Asc,
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(in_billing.iter().map(|c| c.id).collect::<Vec<_>>(), vec![a]);

    let tagged = ConversationRepo::list(
        &pool,
        &[predicate::tagged(urgent.id)],
        "id",
        OrderDir::Asc,
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(tagged.iter().map(|c| c.id).collect::<Vec<_>>(), vec![b]);

    let count = ConversationRepo::count(&pool, &[predicate::not_closed()])
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subject_filter_escapes_wildcards(pool: PgPool) {
    create(&pool, "100% broken", None, None).await;
    create(&pool, "100 items", None, None).await;

    let matches = ConversationRepo::list(
        &pool,
        &[predicate::subject_contains("100%")],
        "id",
        OrderDir::Asc,
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].subject, "100% broken");
}

// ---------------------------------------------------------------------------
// Relations and search documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_load_with_relations_assembles_everything(pool: PgPool) {
    let user = seed_user(&pool, "Dana").await;
    let group = seed_group(&pool, "Support").await;
    let id = create(&pool, "Cannot login", Some(user), Some(group)).await;
    message(&pool, id, "password reset link expired").await;
    ConversationItemRepo::create(
        &pool,
        id,
        ItemType::Note,
        None,
        &ItemBody::Text("internal only".into()),
    )
    .await
    .unwrap();
    let tag = TagRepo::create_or_get(&pool, "auth").await.unwrap();
    TagRepo::attach(&pool, id, tag.id).await.unwrap();
    let mut conn = pool.acquire().await.unwrap();
    AttributeRepo::upsert_many(
        &mut *conn,
        id,
        &[Attribute {
            key: "plan".into(),
            value: AttributeValue::Text("pro".into()),
        }],
    )
    .await
    .unwrap();
    drop(conn);

    let loaded = ConversationRepo::load_with_relations(&pool, &[id, 999_999])
        .await
        .unwrap();
    assert_eq!(loaded.len(), 1);
    let source = &loaded[0];
    assert_eq!(source.user.as_ref().map(|u| u.name.as_str()), Some("Dana"));
    assert_eq!(source.group.as_ref().map(|g| g.id), Some(group));
    assert_eq!(source.messages.len(), 1);
    assert_eq!(source.tag_ids, vec![tag.id]);

    let doc = build_search_document(source);
    assert_eq!(doc["closed_at"], json!("_null"));
    assert_eq!(doc["user"]["email"], json!("dana@example.com"));
    assert_eq!(doc["ca_plan"], json!("pro"));
    assert_eq!(doc["messages"].as_array().map(Vec::len), Some(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attribute_write_and_touch_share_a_transaction(pool: PgPool) {
    let id = create(&pool, "Seats", None, None).await;
    sqlx::query("UPDATE conversations SET updated_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    let before = ConversationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    let seats = [Attribute {
        key: "seats".into(),
        value: AttributeValue::Number(12.into()),
    }];

    let mut tx = pool.begin().await.unwrap();
    AttributeRepo::upsert_many(&mut *tx, id, &seats).await.unwrap();
    ConversationRepo::touch(&mut *tx, id).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(AttributeRepo::list_for_conversation(&pool, id).await.unwrap().is_empty());
    let unchanged = ConversationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(unchanged.updated_at, before.updated_at);

    let mut tx = pool.begin().await.unwrap();
    AttributeRepo::upsert_many(&mut *tx, id, &seats).await.unwrap();
    ConversationRepo::touch(&mut *tx, id).await.unwrap();
    tx.commit().await.unwrap();

    let stored = AttributeRepo::list_for_conversation(&pool, id).await.unwrap();
    assert_eq!(stored, seats.to_vec());
    let touched = ConversationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(touched.updated_at > before.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_subject_and_message_prefix(pool: PgPool) {
    let id = create(&pool, "Invoice missing", None, None).await;
    message(&pool, id, "The attachment never arrived").await;
    let other = create(&pool, "Unrelated", None, None).await;

    for conversation_id in [id, other] {
        let loaded = ConversationRepo::load_with_relations(&pool, &[conversation_id])
            .await
            .unwrap();
        let source = &loaded[0];
        SearchDocumentRepo::upsert(
            &pool,
            conversation_id,
            &build_search_document(source),
            &search_text(source),
        )
        .await
        .unwrap();
    }

    let query = build_prefix_tsquery("attach").unwrap();
    let hits = SearchDocumentRepo::search(&pool, &query, 10, 0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].conversation_id, id);

    let query = build_prefix_tsquery("invoice").unwrap();
    let hits = SearchDocumentRepo::search(&pool, &query, 10, 0).await.unwrap();
    assert_eq!(hits.len(), 1);

    let stored = SearchDocumentRepo::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.document["subject"], json!("Invoice missing"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_replaces_document(pool: PgPool) {
    let id = create(&pool, "First subject", None, None).await;

    SearchDocumentRepo::upsert(&pool, id, &json!({ "v": 1 }), "first")
        .await
        .unwrap();
    SearchDocumentRepo::upsert(&pool, id, &json!({ "v": 2 }), "second")
        .await
        .unwrap();

    let stored = SearchDocumentRepo::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.document, json!({ "v": 2 }));
    let hits = SearchDocumentRepo::search(&pool, "first:*", 10, 0).await.unwrap();
    assert!(hits.is_empty());
}
