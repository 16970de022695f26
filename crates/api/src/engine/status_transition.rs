//! Bulk status transitions.
//!
//! [`change_status`] resolves the target conversations, re-reads the
//! status row under a share lock, computes the closure delta for its
//! category, writes it in a single
//! `UPDATE ... WHERE id = ANY(..)` inside a transaction and, only after the
//! commit succeeds, applies the same delta to the in-memory records and
//! publishes `conversations.updated`.

use chrono::{SubsecRound, Utc};
use helpdesk_core::event_types::CONVERSATIONS_UPDATED;
use helpdesk_core::status::StatusCategory;
use helpdesk_core::transition::plan_status_change;
use helpdesk_core::types::{Actor, DbId};
use helpdesk_db::models::conversation::Conversation;
use helpdesk_db::models::conversation_status::ConversationStatus;
use helpdesk_db::repositories::{ConversationRepo, ConversationStatusRepo, RowLock};
use helpdesk_db::DbPool;
use helpdesk_events::{EventBus, PlatformEvent};
use serde_json::json;

/// The conversations a transition applies to.
#[derive(Debug, Clone)]
pub enum TransitionTarget {
    /// Load these ids first. Unknown ids are dropped.
    Ids(Vec<DbId>),
    /// Records the caller already holds; they are updated in place.
    Loaded(Vec<Conversation>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionOptions {
    /// Publish `conversations.updated` even when the target set is empty.
    pub notify_on_empty: bool,
}

/// Move every target conversation to `status` on behalf of `actor`.
///
/// Returns the updated records. On any database error the error is
/// returned, nothing is published and no record is modified.
pub async fn change_status(
    pool: &DbPool,
    bus: &EventBus,
    status: &ConversationStatus,
    target: TransitionTarget,
    actor: Actor,
    options: TransitionOptions,
) -> Result<Vec<Conversation>, sqlx::Error> {
    let mut conversations = resolve(pool, target).await?;

    if conversations.is_empty() {
        tracing::debug!(status_id = status.id, "Status transition with empty target set");
        if options.notify_on_empty {
            publish(bus, status, actor, &conversations);
        }
        return Ok(conversations);
    }

    let ids: Vec<DbId> = conversations.iter().map(|c| c.id).collect();

    let mut tx = pool.begin().await?;

    // The stored row is authoritative for the category; the share lock
    // holds off catalog edits until commit.
    let status = ConversationStatusRepo::find_locked(&mut *tx, status.id, RowLock::Share)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let category = category_of(&status)?;

    // Postgres keeps microseconds; truncate so memory and row agree.
    let delta = plan_status_change(status.id, category, actor, Utc::now().trunc_subsecs(6));

    let affected = ConversationRepo::bulk_update_status(&mut *tx, &ids, &delta).await?;
    tx.commit().await?;

    if affected != ids.len() as u64 {
        tracing::warn!(
            requested = ids.len(),
            affected,
            status_id = status.id,
            "Status transition touched fewer rows than targeted"
        );
    }

    for conversation in &mut conversations {
        delta.apply(conversation.status_fields_mut());
    }

    tracing::info!(
        conversation_count = conversations.len(),
        status_id = status.id,
        status_category = category.value(),
        closing = delta.is_closing(),
        actor = ?actor,
        "Conversations changed status"
    );

    publish(bus, &status, actor, &conversations);
    Ok(conversations)
}

fn category_of(status: &ConversationStatus) -> Result<StatusCategory, sqlx::Error> {
    StatusCategory::from_value(status.category).ok_or_else(|| {
        sqlx::Error::Decode(format!("invalid status category {}", status.category).into())
    })
}

async fn resolve(
    pool: &DbPool,
    target: TransitionTarget,
) -> Result<Vec<Conversation>, sqlx::Error> {
    match target {
        TransitionTarget::Loaded(conversations) => Ok(conversations),
        TransitionTarget::Ids(mut ids) => {
            ids.sort_unstable();
            ids.dedup();
            let found = ConversationRepo::find_many(pool, &ids).await?;
            if found.len() != ids.len() {
                let missing: Vec<DbId> = ids
                    .iter()
                    .copied()
                    .filter(|id| !found.iter().any(|c| c.id == *id))
                    .collect();
                tracing::warn!(?missing, "Dropping unknown conversation ids from transition");
            }
            Ok(found)
        }
    }
}

fn publish(
    bus: &EventBus,
    status: &ConversationStatus,
    actor: Actor,
    conversations: &[Conversation],
) {
    let ids: Vec<DbId> = conversations.iter().map(|c| c.id).collect();
    let event = PlatformEvent::new(CONVERSATIONS_UPDATED)
        .with_optional_actor(actor.user_id())
        .with_payload(json!({
            "status_id": status.id,
            "status_category": status.category,
            "conversations": conversations,
        }))
        .with_conversation_ids(&ids);
    bus.publish(event);
}
