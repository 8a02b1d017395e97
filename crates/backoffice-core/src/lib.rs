//! Backoffice Core — domain models, error taxonomy and list helpers
//! shared by every crate of the console.

pub mod error;
pub mod listing;
pub mod models;

pub use error::{BackofficeError, BackofficeResult};
