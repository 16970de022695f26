//! Help desk event bus and background listeners.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`EventPersistence`]: writes every event to the `events` table.
//! - [`SearchIndexer`]: keeps `conversation_search_documents` in step with
//!   conversation events.

pub mod bus;
pub mod indexer;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use indexer::SearchIndexer;
pub use persistence::EventPersistence;
