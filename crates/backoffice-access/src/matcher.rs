//! Navigation path (or module id) to the owning module.
//!
//! A module matches a path when one of its route strings equals the
//! path, or is a prefix of it followed by `/`, so a view route such as
//! `/settings/role-management` also owns
//! `/settings/role-management/edit/7`. The forest is walked in
//! pre-order and the first match wins: a parent whose route prefixes a
//! child's route shadows the child.

use backoffice_core::models::module::{ModuleId, ModuleNode, ModuleRecord, PreOrder};
use tracing::debug;

use crate::context::AccessQuery;

/// Cut the query string and fragment, then drop trailing slashes.
/// A bare `/` is kept as `/`.
pub fn normalize_path(path: &str) -> &str {
    let cut = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = cut.trim_end_matches('/');
    if trimmed.is_empty() && cut.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Exact or `/`-separated prefix match, after normalizing both sides.
pub fn url_matches(candidate: &str, path: &str) -> bool {
    let candidate = normalize_path(candidate);
    let path = normalize_path(path);
    if candidate.is_empty() || path.is_empty() {
        return false;
    }
    path == candidate
        || path
            .strip_prefix(candidate)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn matches_path(record: &ModuleRecord, path: &str) -> bool {
    record.urls.candidates().any(|c| url_matches(c, path))
}

pub fn find_by_path<'a>(forest: &'a [ModuleNode], path: &str) -> Option<&'a ModuleNode> {
    find(forest, &AccessQuery::path(path))
}

pub fn find_by_id(forest: &[ModuleNode], id: ModuleId) -> Option<&ModuleNode> {
    find(forest, &AccessQuery::module(id))
}

/// First node in pre-order whose id equals the query's module id or
/// whose routes match the query's path.
pub fn find<'a>(forest: &'a [ModuleNode], query: &AccessQuery<'_>) -> Option<&'a ModuleNode> {
    if query.is_empty() {
        return None;
    }
    let path = query.path.map(normalize_path).filter(|p| !p.is_empty());

    let found = PreOrder::forest(forest).find(|node| {
        query.module_id == Some(node.record.id) || path.is_some_and(|p| matches_path(&node.record, p))
    });

    match found {
        Some(node) => debug!(
            module_id = node.record.id,
            module = %node.record.name,
            path = ?path,
            "module matched"
        ),
        None => debug!(path = ?path, module_id = ?query.module_id, "no module matched"),
    }
    found
}
