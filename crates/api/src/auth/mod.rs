//! Authentication primitives.
//!
//! Tokens are issued by the surrounding platform; this service only
//! validates them.

pub mod jwt;
