//! Tests for the bulk status transition engine, called directly.

mod common;

use assert_matches::assert_matches;
use helpdesk_api::engine::{change_status, TransitionOptions, TransitionTarget};
use helpdesk_core::event_types::CONVERSATIONS_UPDATED;
use helpdesk_core::status::StatusCategory;
use helpdesk_core::types::{Actor, DbId};
use helpdesk_db::models::conversation::{Conversation, CreateConversation};
use helpdesk_db::models::conversation_status::ConversationStatus;
use helpdesk_db::repositories::{ConversationRepo, ConversationStatusRepo};
use helpdesk_events::EventBus;
use sqlx::PgPool;
use tokio::sync::broadcast::error::TryRecvError;

async fn status(pool: &PgPool, category: StatusCategory) -> ConversationStatus {
    ConversationStatusRepo::default_for_category(pool, category)
        .await
        .unwrap()
        .unwrap()
}

async fn conversation(pool: &PgPool, subject: &str) -> Conversation {
    let open = status(pool, StatusCategory::Open).await;
    let input = CreateConversation {
        subject: subject.to_string(),
        user_id: None,
        assignee_id: None,
        group_id: None,
        status_id: None,
    };
    ConversationRepo::create(pool, &input, &open, Actor::System).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn loaded_records_are_updated_in_place_and_match_storage(pool: PgPool) {
    let agent_id = common::seed_user(&pool, "Agent", "agent").await;
    let a = conversation(&pool, "A").await;
    let b = conversation(&pool, "B").await;
    let closed = status(&pool, StatusCategory::Closed).await;
    let bus = EventBus::default();

    let updated = change_status(
        &pool,
        &bus,
        &closed,
        TransitionTarget::Loaded(vec![a.clone(), b.clone()]),
        Actor::Agent(agent_id),
        TransitionOptions::default(),
    )
    .await
    .unwrap();

    let stored = ConversationRepo::find_many(&pool, &[a.id, b.id]).await.unwrap();
    assert_eq!(updated, stored);
    assert!(updated.iter().all(|c| c.closed_by == Some(agent_id)));
    assert!(updated.iter().all(|c| c.closed_at.is_some()));
    assert_eq!(updated[0].updated_at, a.updated_at);
    assert_eq!(updated[1].updated_at, b.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locked_counts_as_closed_and_system_keeps_closer(pool: PgPool) {
    let agent_id = common::seed_user(&pool, "Agent", "agent").await;
    let c = conversation(&pool, "C").await;
    let closed = status(&pool, StatusCategory::Closed).await;
    let locked = status(&pool, StatusCategory::Locked).await;
    let bus = EventBus::default();

    let first = change_status(
        &pool,
        &bus,
        &closed,
        TransitionTarget::Ids(vec![c.id]),
        Actor::Agent(agent_id),
        TransitionOptions::default(),
    )
    .await
    .unwrap();

    let second = change_status(
        &pool,
        &bus,
        &locked,
        TransitionTarget::Ids(vec![c.id]),
        Actor::System,
        TransitionOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(second[0].status_category, 1);
    assert_eq!(second[0].closed_by, Some(agent_id));
    assert!(second[0].closed_at >= first[0].closed_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_is_published_once_with_every_id(pool: PgPool) {
    let a = conversation(&pool, "A").await;
    let b = conversation(&pool, "B").await;
    let pending = status(&pool, StatusCategory::Pending).await;
    let bus = EventBus::default();
    let mut rx = bus.subscribe();

    change_status(
        &pool,
        &bus,
        &pending,
        TransitionTarget::Ids(vec![b.id, a.id, 404_404]),
        Actor::System,
        TransitionOptions::default(),
    )
    .await
    .unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, CONVERSATIONS_UPDATED);
    assert_eq!(event.actor_user_id, None);
    let mut ids: Vec<DbId> = event.conversation_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![a.id, b.id]);
    assert_eq!(event.payload["conversations"].as_array().unwrap().len(), 2);
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_target_notifies_only_when_asked(pool: PgPool) {
    let closed = status(&pool, StatusCategory::Closed).await;
    let bus = EventBus::default();
    let mut rx = bus.subscribe();

    let updated = change_status(
        &pool,
        &bus,
        &closed,
        TransitionTarget::Ids(vec![]),
        Actor::System,
        TransitionOptions::default(),
    )
    .await
    .unwrap();
    assert!(updated.is_empty());
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));

    change_status(
        &pool,
        &bus,
        &closed,
        TransitionTarget::Loaded(vec![]),
        Actor::System,
        TransitionOptions {
            notify_on_empty: true,
        },
    )
    .await
    .unwrap();
    let event = rx.try_recv().unwrap();
    assert!(event.conversation_ids().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_comes_from_the_stored_status(pool: PgPool) {
    let agent_id = common::seed_user(&pool, "Agent", "agent").await;
    let c = conversation(&pool, "Stale").await;
    let pending = status(&pool, StatusCategory::Pending).await;
    let mut stale = pending.clone();
    stale.category = StatusCategory::Closed.value();
    let bus = EventBus::default();
    let mut rx = bus.subscribe();

    let updated = change_status(
        &pool,
        &bus,
        &stale,
        TransitionTarget::Ids(vec![c.id]),
        Actor::Agent(agent_id),
        TransitionOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(updated[0].status_category, pending.category);
    assert!(updated[0].closed_at.is_none());
    assert!(updated[0].closed_by.is_none());
    let stored = ConversationRepo::find_by_id(&pool, c.id).await.unwrap().unwrap();
    assert_eq!(updated[0], stored);
    let event = rx.try_recv().unwrap();
    assert_eq!(event.payload["status_category"], pending.category);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_write_leaves_records_and_bus_untouched(pool: PgPool) {
    let a = conversation(&pool, "A").await;
    let b = conversation(&pool, "B").await;
    let closed = status(&pool, StatusCategory::Closed).await;
    let bus = EventBus::default();
    let mut rx = bus.subscribe();

    // `closed_by` references users, so an unknown agent fails the write.
    let result = change_status(
        &pool,
        &bus,
        &closed,
        TransitionTarget::Loaded(vec![a.clone(), b.clone()]),
        Actor::Agent(987_654),
        TransitionOptions::default(),
    )
    .await;

    let err = result.unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23503")
    );
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    let stored = ConversationRepo::find_many(&pool, &[a.id, b.id]).await.unwrap();
    assert_eq!(stored, vec![a, b]);
}
