//! Well-known role name constants.
//!
//! These must match the `users.role` check constraint in
//! `20260301000001_create_users_and_groups.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AGENT: &str = "agent";
pub const ROLE_CUSTOMER: &str = "customer";
