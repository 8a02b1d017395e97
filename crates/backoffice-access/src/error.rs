//! Errors raised while loading module data.

use backoffice_core::error::BackofficeError;
use backoffice_core::models::module::ModuleId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("duplicate module id {0}")]
    DuplicateModule(ModuleId),

    #[error("cyclic parent chain through modules {chain:?}")]
    CyclicParent { chain: Vec<ModuleId> },

    #[error("invalid module entry: {0}")]
    InvalidEntry(String),
}

impl From<AccessError> for BackofficeError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidEntry(msg) => BackofficeError::MalformedPayload(msg),
            other => BackofficeError::data_integrity(other.to_string()),
        }
    }
}
