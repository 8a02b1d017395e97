//! The access context handed to permission checks.

use backoffice_core::models::module::{ModuleId, ModuleNode, ModuleRecord, ModuleRow};
use backoffice_core::models::permission::PermissionRecord;
use tracing::warn;

use crate::error::AccessError;
use crate::normalize::{ModuleEntry, flatten_entries};
use crate::tree::build_forest;
use crate::{matcher, permissions};

/// What to look up: a navigation path, a module id, or both. With both,
/// a node matches on either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessQuery<'a> {
    pub path: Option<&'a str>,
    pub module_id: Option<ModuleId>,
}

impl<'a> AccessQuery<'a> {
    pub fn path(path: &'a str) -> Self {
        Self {
            path: Some(path),
            module_id: None,
        }
    }

    pub fn module(module_id: ModuleId) -> Self {
        Self {
            path: None,
            module_id: Some(module_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none_or(|p| p.is_empty()) && self.module_id.is_none()
    }
}

/// Module forest of one authenticated user.
///
/// Derived from the module access list of an auth payload and rebuilt
/// whenever that payload changes. Holds no other state, so every
/// lookup is a pure function of the context and the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessContext {
    forest: Vec<ModuleNode>,
    len: usize,
}

impl AccessContext {
    /// Context that knows no modules: every lookup resolves to the
    /// fallback record.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn try_from_records(records: Vec<ModuleRecord>) -> Result<Self, AccessError> {
        let len = records.len();
        let forest = build_forest(records)?;
        Ok(Self { forest, len })
    }

    pub fn try_from_entries(entries: Vec<ModuleEntry>) -> Result<Self, AccessError> {
        Self::try_from_records(flatten_entries(entries))
    }

    /// Build from raw wire rows. Rows that cannot be read as a module
    /// are skipped.
    pub fn try_from_rows(rows: Vec<ModuleRow>) -> Result<Self, AccessError> {
        let entries = rows
            .into_iter()
            .filter_map(|row| match ModuleEntry::try_from(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping module access entry");
                    None
                }
            })
            .collect();
        Self::try_from_entries(entries)
    }

    pub fn forest(&self) -> &[ModuleNode] {
        &self.forest
    }

    /// Number of modules in the forest.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn find(&self, query: AccessQuery<'_>) -> Option<&ModuleRecord> {
        matcher::find(&self.forest, &query).map(|node| &node.record)
    }

    /// Permission record for `query`. `None` when the query names
    /// neither a path nor a module; otherwise the matched module's
    /// record or the fallback.
    pub fn resolve(&self, query: AccessQuery<'_>) -> Option<PermissionRecord> {
        if query.is_empty() {
            return None;
        }
        Some(permissions::extract(self.find(query)))
    }

    pub fn permissions_for_path(&self, path: &str) -> PermissionRecord {
        permissions::extract(self.find(AccessQuery::path(path)))
    }

    pub fn permissions_for_module(&self, module_id: ModuleId) -> PermissionRecord {
        permissions::extract(self.find(AccessQuery::module(module_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::models::module::ModuleUrls;

    fn roles_module(id: ModuleId) -> ModuleRecord {
        ModuleRecord::new(id, "Role Management")
            .with_urls(ModuleUrls::view("/settings/role-management"))
            .with_permissions(PermissionRecord {
                can_view: true,
                can_add: true,
                ..PermissionRecord::NONE
            })
    }

    #[test]
    fn empty_context_resolves_to_fallback() {
        let ctx = AccessContext::empty();
        assert!(ctx.is_empty());
        assert_eq!(ctx.permissions_for_path("/anything"), PermissionRecord::FALLBACK);
        assert_eq!(ctx.permissions_for_module(3), PermissionRecord::FALLBACK);
    }

    #[test]
    fn empty_query_has_no_opinion() {
        let ctx = AccessContext::try_from_records(vec![roles_module(1)]).unwrap();
        assert_eq!(ctx.resolve(AccessQuery::default()), None);
        assert_eq!(ctx.resolve(AccessQuery::path("")), None);
    }

    #[test]
    fn nested_route_resolves_to_owning_module() {
        let ctx = AccessContext::try_from_records(vec![roles_module(1)]).unwrap();
        let perms = ctx.permissions_for_path("/settings/role-management/edit/5");
        assert!(perms.can_add);
        assert!(!perms.can_update);
    }

    #[test]
    fn id_or_path_matches() {
        let ctx = AccessContext::try_from_records(vec![
            ModuleRecord::new(1, "Dashboard").with_urls(ModuleUrls::view("/dashboard")),
            roles_module(2),
        ])
        .unwrap();
        let query = AccessQuery {
            path: Some("/nowhere"),
            module_id: Some(2),
        };
        assert_eq!(ctx.find(query).unwrap().name, "Role Management");
    }

    #[test]
    fn unreadable_rows_are_skipped() {
        let rows = vec![
            ModuleRow {
                pk_module_id: Some(1),
                name: Some("Dashboard".into()),
                ..ModuleRow::default()
            },
            ModuleRow {
                name: Some("no id".into()),
                ..ModuleRow::default()
            },
        ];
        let ctx = AccessContext::try_from_rows(rows).unwrap();
        assert_eq!(ctx.len(), 1);
    }
}
