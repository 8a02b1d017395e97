//! Inspection of the cached bearer token.
//!
//! The backend signs and verifies tokens; the console only reads the
//! claims it needs to decide whether a cached session is stale.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Claims read from a cached JWT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration (Unix timestamp).
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at (Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// True once `now` is past `exp` plus `leeway_secs`. Tokens without
    /// `exp` never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_secs: u64) -> bool {
        let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
        self.exp
            .is_some_and(|exp| exp.saturating_add(leeway) < now.timestamp())
    }
}

/// Read the claims of `token` without verifying its signature.
///
/// Returns `Ok(None)` for opaque (non-JWT) tokens.
pub fn inspect_token(token: &str) -> AuthResult<Option<TokenClaims>> {
    if token.split('.').count() != 3 {
        return Ok(None);
    }

    let header = jsonwebtoken::decode_header(token)
        .map_err(|e| AuthError::TokenInvalid(format!("header: {e}")))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| Some(data.claims))
        .map_err(|e| AuthError::TokenInvalid(e.to_string()))
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
