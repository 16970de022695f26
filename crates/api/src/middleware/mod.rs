//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`]: the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAgent`]: requires `agent` or `admin`.
//! - [`rbac::RequireAdmin`]: requires `admin`.

pub mod auth;
pub mod rbac;
