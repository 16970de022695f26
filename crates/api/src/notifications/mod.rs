//! Event-to-client push.
//!
//! [`ConversationBroadcaster`] subscribes to the event bus and forwards
//! conversation change notices to every WebSocket client.

pub mod broadcaster;

pub use broadcaster::ConversationBroadcaster;
