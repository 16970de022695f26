//! Repository for the `conversations` table.
//!
//! Includes the bulk status write used by the transition engine and the
//! relation loader that feeds the search projection.

use std::collections::HashMap;

use helpdesk_core::predicate::ConversationPredicate;
use helpdesk_core::search::MAX_INDEXED_MESSAGES;
use helpdesk_core::status::is_closed_value;
use helpdesk_core::transition::StatusDelta;
use helpdesk_core::types::{Actor, DbId};
use helpdesk_core::view::OrderDir;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::filter::{push_order, push_predicates};
use crate::models::attribute::ConversationAttributeRow;
use crate::models::conversation::{Conversation, ConversationWithRelations, CreateConversation};
use crate::models::conversation_status::ConversationStatus;
use crate::repositories::{AttributeRepo, ConversationItemRepo, TagRepo, UserRepo};

/// Column list for `conversations` queries.
const COLUMNS: &str = "\
    conversations.id, conversations.subject, conversations.user_id, \
    conversations.status_id, conversations.status_category, conversations.assignee_id, \
    conversations.group_id, conversations.closed_at, conversations.closed_by, \
    conversations.created_at, conversations.updated_at";

pub struct ConversationRepo;

impl ConversationRepo {
    /// Insert a conversation in `status` on behalf of `actor`. Starting in a
    /// closed category stamps `closed_at`, and `closed_by` when the actor is
    /// an agent.
    pub async fn create(
        pool: &PgPool,
        input: &CreateConversation,
        status: &ConversationStatus,
        actor: Actor,
    ) -> Result<Conversation, sqlx::Error> {
        let closed = is_closed_value(status.category);
        let closed_by = if closed { actor.agent_id() } else { None };

        let query = format!(
            "INSERT INTO conversations \
                 (subject, user_id, status_id, status_category, assignee_id, group_id, \
                  closed_at, closed_by) \
             VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $7 THEN NOW() ELSE NULL END, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(input.subject.trim())
            .bind(input.user_id)
            .bind(status.id)
            .bind(status.category)
            .bind(input.assignee_id)
            .bind(input.group_id)
            .bind(closed)
            .bind(closed_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversations WHERE id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load many conversations by id, ordered by id. Unknown ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Conversation>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM conversations WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List conversations matching every predicate.
    pub async fn list(
        pool: &PgPool,
        predicates: &[ConversationPredicate],
        order_by: &str,
        order_dir: OrderDir,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM conversations"));
        push_predicates(&mut builder, predicates);
        push_order(&mut builder, order_by, order_dir);
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        builder
            .build_query_as::<Conversation>()
            .fetch_all(pool)
            .await
    }

    /// Count conversations matching every predicate.
    pub async fn count(
        pool: &PgPool,
        predicates: &[ConversationPredicate],
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM conversations");
        push_predicates(&mut builder, predicates);
        let row = builder.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(row.0)
    }

    /// Write a status delta to every listed conversation in one statement.
    ///
    /// Only `status_id`, `status_category`, `closed_at` and (when the delta
    /// says so) `closed_by` are written. Runs on the caller's connection so
    /// it can be part of a transaction.
    pub async fn bulk_update_status(
        conn: &mut PgConnection,
        ids: &[DbId],
        delta: &StatusDelta,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let closed_by_update = delta.closed_by_update();
        let result = sqlx::query(
            "UPDATE conversations SET \
                 status_id = $1, \
                 status_category = $2, \
                 closed_at = $3, \
                 closed_by = CASE WHEN $4 THEN $5 ELSE closed_by END \
             WHERE id = ANY($6)",
        )
        .bind(delta.status_id)
        .bind(delta.status_category.value())
        .bind(delta.closed_at())
        .bind(closed_by_update.is_some())
        .bind(closed_by_update.flatten())
        .bind(ids)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Bump `updated_at` after a related row changed.
    pub async fn touch(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Load conversations with customer, group, first messages, tags and
    /// attributes, in id order. Unknown ids are skipped.
    pub async fn load_with_relations(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ConversationWithRelations>, sqlx::Error> {
        let conversations = Self::find_many(pool, ids).await?;
        if conversations.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = conversations.iter().map(|c| c.id).collect();

        let user_ids: Vec<DbId> = conversations.iter().filter_map(|c| c.user_id).collect();
        let group_ids: Vec<DbId> = conversations.iter().filter_map(|c| c.group_id).collect();

        let users: HashMap<_, _> = UserRepo::find_many(pool, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let groups: HashMap<_, _> = UserRepo::find_groups(pool, &group_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let mut messages: HashMap<DbId, Vec<_>> = HashMap::new();
        for item in ConversationItemRepo::messages_for_conversations(
            pool,
            &ids,
            MAX_INDEXED_MESSAGES as i64,
        )
        .await?
        {
            messages.entry(item.conversation_id).or_default().push(item);
        }

        let mut tags: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for link in TagRepo::links_for_conversations(pool, &ids).await? {
            tags.entry(link.conversation_id).or_default().push(link.tag_id);
        }

        let mut attributes: HashMap<DbId, Vec<_>> = HashMap::new();
        for row in AttributeRepo::rows_for_conversations(pool, &ids).await? {
            let conversation_id = row.conversation_id;
            if let Some(attribute) = ConversationAttributeRow::into_attribute(row) {
                attributes.entry(conversation_id).or_default().push(attribute);
            }
        }

        Ok(conversations
            .into_iter()
            .map(|conversation| {
                let id = conversation.id;
                ConversationWithRelations {
                    user: conversation.user_id.and_then(|uid| users.get(&uid).cloned()),
                    group: conversation.group_id.and_then(|gid| groups.get(&gid).cloned()),
                    messages: messages.remove(&id).unwrap_or_default(),
                    tag_ids: tags.remove(&id).unwrap_or_default(),
                    attributes: attributes.remove(&id).unwrap_or_default(),
                    conversation,
                }
            })
            .collect())
    }
}
