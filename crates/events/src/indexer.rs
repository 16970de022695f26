//! Search read-model synchronization.
//!
//! [`SearchIndexer`] listens for conversation events and rebuilds the
//! stored search document of every conversation they list.

use helpdesk_core::event_types::REINDEX_EVENT_TYPES;
use helpdesk_core::types::DbId;
use helpdesk_db::repositories::{ConversationRepo, SearchDocumentRepo};
use helpdesk_db::search_document::{build_search_document, search_text};
use helpdesk_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

pub struct SearchIndexer {
    pool: DbPool,
}

impl SearchIndexer {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the indexing loop until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if !should_reindex(&event) {
                        continue;
                    }
                    let ids = event.conversation_ids();
                    if let Err(e) = self.reindex(&ids).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            conversation_count = ids.len(),
                            "Failed to reindex conversations"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Search indexer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, search indexer shutting down");
                    break;
                }
            }
        }
    }

    /// Rebuild and store the documents for `ids`. Returns how many were
    /// written; ids without a conversation are skipped.
    pub async fn reindex(&self, ids: &[DbId]) -> Result<usize, sqlx::Error> {
        let sources = ConversationRepo::load_with_relations(&self.pool, ids).await?;
        for source in &sources {
            SearchDocumentRepo::upsert(
                &self.pool,
                source.conversation.id,
                &build_search_document(source),
                &search_text(source),
            )
            .await?;
        }
        tracing::debug!(indexed = sources.len(), requested = ids.len(), "Reindexed conversations");
        Ok(sources.len())
    }
}

/// Whether an event changes anything the search document reads.
///
/// Every new item bumps the conversation's `updated_at`, which the
/// document carries, so item events count whatever their type.
pub fn should_reindex(event: &PlatformEvent) -> bool {
    REINDEX_EVENT_TYPES.contains(&event.event_type.as_str())
}
