//! Bearer token verification.
//!
//! The platform's identity service signs HS256 tokens carrying
//! [`AccessClaims`]; this service only checks them.

use helpdesk_core::types::DbId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Default clock skew tolerated on `exp`, in seconds.
const DEFAULT_LEEWAY_SECS: u64 = 60;

/// What the service reads from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// The user's database id.
    pub sub: DbId,
    /// `"admin"`, `"agent"` or `"customer"`.
    pub role: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    pub leeway_secs: u64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_LEEWAY_SECS` (default `60`).
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or the leeway does not parse.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let leeway_secs = std::env::var("JWT_LEEWAY_SECS")
            .map(|v| v.parse().expect("JWT_LEEWAY_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_LEEWAY_SECS);

        Self {
            secret,
            leeway_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

/// Verify signature and expiry, returning the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )?;
    Ok(data.claims)
}
