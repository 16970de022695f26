//! Conversation workflow services.
//!
//! [`status_transition`] moves batches of conversations to a new status:
//! one transactional bulk write, then in-memory update and notification.

pub mod status_transition;

pub use status_transition::{change_status, TransitionOptions, TransitionTarget};
