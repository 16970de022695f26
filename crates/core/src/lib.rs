//! Help desk domain logic.
//!
//! Everything in this crate is free of I/O so it can be shared by the
//! repository layer, the HTTP server and the event listeners.

pub mod attribute;
pub mod error;
pub mod event_types;
pub mod feed;
pub mod item;
pub mod predicate;
pub mod roles;
pub mod search;
pub mod status;
pub mod transition;
pub mod types;
pub mod view;
