//! Error types for the backoffice console.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackofficeError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Module data that cannot form a forest (cycles, duplicate ids).
    #[error("Data integrity violation: {reason}")]
    DataIntegrity { reason: String },

    #[error("Malformed auth payload: {0}")]
    MalformedPayload(String),

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackofficeError {
    pub fn data_integrity(reason: impl Into<String>) -> Self {
        Self::DataIntegrity {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

pub type BackofficeResult<T> = Result<T, BackofficeError>;
