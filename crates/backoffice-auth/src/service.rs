//! Session service: caching the login payload and answering access
//! questions from it.

use backoffice_access::{AccessContext, AccessQuery};
use backoffice_core::models::permission::PermissionRecord;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::payload::AuthPayload;
use crate::store::PayloadStore;
use crate::token;

pub const AUTHORIZATION: &str = "Authorization";
pub const X_APP_ID: &str = "X-APP-ID";

/// Auth payload cache.
///
/// Generic over the storage backend so the same logic runs against the
/// in-memory store in tests and the file store in the CLI.
pub struct AuthService<S: PayloadStore> {
    store: S,
    config: AuthConfig,
}

impl<S: PayloadStore> AuthService<S> {
    pub fn new(store: S, config: AuthConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Cache the payload returned by a successful login.
    pub fn save(&self, payload: &AuthPayload) -> AuthResult<()> {
        self.store
            .save(&self.config.storage_key, &payload.to_json()?)?;
        info!(
            user = payload.user.username.as_deref().unwrap_or("-"),
            modules = payload.user.module_access.len(),
            "auth payload cached"
        );
        Ok(())
    }

    /// Parse a raw login response and cache it.
    pub fn login(&self, raw_response: &str) -> AuthResult<AuthPayload> {
        let payload = AuthPayload::from_json(raw_response)?;
        if payload.token.is_empty() {
            return Err(AuthError::MalformedPayload("login response has no token".into()));
        }
        self.save(&payload)?;
        Ok(payload)
    }

    /// Load the cached payload, reporting every failure.
    ///
    /// `Ok(None)` when nothing is cached. An expired token is
    /// [`AuthError::TokenExpired`] when expiry is enforced.
    pub fn load(&self) -> AuthResult<Option<AuthPayload>> {
        let Some(raw) = self.store.load(&self.config.storage_key)? else {
            return Ok(None);
        };
        let payload = AuthPayload::from_json(&raw)?;

        if self.config.enforce_token_expiry {
            match token::inspect_token(&payload.token) {
                Ok(Some(claims))
                    if claims.is_expired_at(Utc::now(), self.config.token_leeway_secs) =>
                {
                    return Err(AuthError::TokenExpired);
                }
                Ok(_) => {}
                // The backend is the judge of token validity.
                Err(e) => warn!(error = %e, "cached token is not a readable JWT"),
            }
        }
        Ok(Some(payload))
    }

    /// The cached payload of a logged-in session.
    ///
    /// [`AuthError::NotAuthenticated`] when nothing is cached or the
    /// cached payload carries no token; other load failures pass through.
    pub fn require(&self) -> AuthResult<AuthPayload> {
        self.load()?
            .filter(|p| !p.token.is_empty())
            .ok_or(AuthError::NotAuthenticated)
    }

    /// The cached payload, or `None` if absent, unreadable or expired.
    pub fn current(&self) -> Option<AuthPayload> {
        match self.load() {
            Ok(payload) => payload,
            Err(AuthError::TokenExpired) => {
                debug!("cached token expired");
                None
            }
            Err(e) => {
                warn!(error = %e, "cached auth payload unusable");
                None
            }
        }
    }

    /// Logout: drop the cached payload.
    pub fn clear(&self) -> AuthResult<()> {
        self.store.remove(&self.config.storage_key)?;
        info!("auth payload cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some_and(|p| !p.token.is_empty())
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.current()
            .filter(|p| !p.token.is_empty())
            .map(|p| token::bearer(&p.token))
    }

    /// Headers every backend request carries: the bearer token when
    /// logged in and the configured application id.
    pub fn request_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(auth) = self.authorization_header() {
            headers.push((AUTHORIZATION, auth));
        }
        if let Some(app_id) = self.config.app_id.as_deref().filter(|id| !id.is_empty()) {
            headers.push((X_APP_ID, app_id.to_owned()));
        }
        headers
    }

    /// Access context of the current session; empty when logged out.
    pub fn access_context(&self) -> AccessContext {
        self.current()
            .map(|p| p.access_context())
            .unwrap_or_default()
    }

    /// Permission record for a path or module id in the current
    /// session. `None` when the query names neither.
    pub fn module_access(&self, query: AccessQuery<'_>) -> Option<PermissionRecord> {
        self.access_context().resolve(query)
    }
}
