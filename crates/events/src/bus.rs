//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Conversation events carry the affected ids under
//! [`CONVERSATION_IDS_KEY`] in their payload.

use chrono::{DateTime, Utc};
use helpdesk_core::event_types::ENTITY_CONVERSATION;
use helpdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Payload key listing the conversations an event concerns.
pub const CONVERSATION_IDS_KEY: &str = "conversation_ids";

/// Payload key carrying the item type on `conversation.item_created`.
pub const ITEM_TYPE_KEY: &str = "item_type";

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event.
///
/// Built with [`PlatformEvent::new`] and the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"conversations.updated"`.
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    /// User that triggered the event, if any.
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create an event with an empty object payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Event about a single conversation. Sets the source entity and the
    /// `conversation_ids` payload key.
    pub fn for_conversation(event_type: impl Into<String>, conversation_id: DbId) -> Self {
        Self::new(event_type)
            .with_source(ENTITY_CONVERSATION, conversation_id)
            .with_conversation_ids(&[conversation_id])
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach the acting user when there is one (system actions have none).
    pub fn with_optional_actor(mut self, user_id: Option<DbId>) -> Self {
        self.actor_user_id = user_id;
        self
    }

    /// Replace the JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Set one payload key, turning a non-object payload into an object.
    pub fn with_field(mut self, key: &str, value: serde_json::Value) -> Self {
        if !self.payload.is_object() {
            self.payload = serde_json::Value::Object(Default::default());
        }
        if let Some(map) = self.payload.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn with_conversation_ids(self, ids: &[DbId]) -> Self {
        self.with_field(CONVERSATION_IDS_KEY, serde_json::json!(ids))
    }

    /// Conversation ids listed in the payload. Non-integer entries are
    /// skipped; a missing key yields an empty list.
    pub fn conversation_ids(&self) -> Vec<DbId> {
        self.payload
            .get(CONVERSATION_IDS_KEY)
            .and_then(|v| v.as_array())
            .map(|ids| ids.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use helpdesk_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::for_conversation("conversation.created", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// When the buffer is full the oldest events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped silently when nobody
    /// is subscribed.
    pub fn publish(&self, event: PlatformEvent) {
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::trace!(receivers, "Event published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
