use std::sync::Arc;

use helpdesk_core::event_types::REINDEX_EVENT_TYPES;
use helpdesk_events::PlatformEvent;
use serde_json::json;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Pushes `{ "type": event_type, "conversation_ids": [..] }` to every
/// connected client for each conversation event.
pub struct ConversationBroadcaster {
    ws_manager: Arc<WsManager>,
}

impl ConversationBroadcaster {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run until the event bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Some(message) = client_message(&event) {
                        let delivered = self.ws_manager.broadcast_json(&message).await;
                        tracing::debug!(
                            event_type = %event.event_type,
                            delivered,
                            "Broadcast conversation event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Conversation broadcaster lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, conversation broadcaster shutting down");
                    break;
                }
            }
        }
    }
}

/// The client-facing notice for an event, or `None` for events clients do
/// not care about. Only ids are sent; clients refetch what they display.
pub fn client_message(event: &PlatformEvent) -> Option<serde_json::Value> {
    if !REINDEX_EVENT_TYPES.contains(&event.event_type.as_str()) {
        return None;
    }
    Some(json!({
        "type": event.event_type,
        "conversation_ids": event.conversation_ids(),
    }))
}
