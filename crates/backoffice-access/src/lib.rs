//! Backoffice Access — module access resolution.
//!
//! Turns the module access list of an auth payload into a forest of
//! modules and answers "what may the current user do here?" for a
//! navigation path or module id:
//!
//! - [`normalize`]: flat and pre-nested module entries, one representation
//! - [`tree`]: flat records to a parent/child forest
//! - [`matcher`]: path or id to the owning module (first pre-order match)
//! - [`permissions`]: matched module to its permission record, or the
//!   visible-but-not-actionable fallback
//! - [`AccessContext`]: the explicit context object tying them together

pub mod context;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod permissions;
pub mod tree;

pub use context::{AccessContext, AccessQuery};
pub use error::AccessError;
pub use normalize::ModuleEntry;
