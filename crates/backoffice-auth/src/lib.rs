//! Backoffice Auth — the login payload cache, bearer token inspection
//! and per-session access resolution.

pub mod config;
pub mod error;
pub mod payload;
pub mod service;
pub mod store;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use payload::{AuthPayload, AuthUser};
pub use service::AuthService;
pub use store::{FilePayloadStore, MemoryPayloadStore, PayloadStore};
pub use token::TokenClaims;
