//! Domain models for the backoffice console.
//!
//! Field names follow Rust conventions; the backend's wire names
//! (`pk_module_id`, `fk_role_id`, `is_view`, ...) are mapped with serde
//! attributes.

pub mod access;
pub mod app;
pub mod module;
pub mod permission;
pub mod role;
pub mod user;
