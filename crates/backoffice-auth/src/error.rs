//! Authentication error types.

use backoffice_core::error::BackofficeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("malformed auth payload: {0}")]
    MalformedPayload(String),

    #[error("payload storage error: {0}")]
    Storage(String),

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::MalformedPayload(err.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<AuthError> for BackofficeError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated | AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                BackofficeError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::MalformedPayload(msg) => BackofficeError::MalformedPayload(msg),
            AuthError::Storage(msg) => BackofficeError::Storage(msg),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
