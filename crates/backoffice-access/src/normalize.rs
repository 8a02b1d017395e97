//! Boundary normalization of module entries.
//!
//! The backend sends the module access list in two shapes: flat rows
//! linked by `fk_parent_id` with a single `url`, and pre-nested rows
//! with `children` and the `url_*` family. Both are accepted as a
//! [`ModuleEntry`] and flattened into records, so the forest is always
//! produced by [`crate::tree::build_forest`].

use backoffice_core::models::module::{ModuleId, ModuleRecord, ModuleRow};
use serde::Deserialize;
use tracing::warn;

use crate::error::AccessError;

/// A module as received, flat or with nested children.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ModuleRow")]
pub enum ModuleEntry {
    Flat(ModuleRecord),
    Tree {
        record: ModuleRecord,
        children: Vec<ModuleEntry>,
    },
}

impl ModuleEntry {
    pub fn record(&self) -> &ModuleRecord {
        match self {
            ModuleEntry::Flat(record) | ModuleEntry::Tree { record, .. } => record,
        }
    }
}

impl TryFrom<ModuleRow> for ModuleEntry {
    type Error = AccessError;

    /// Fails only when the row itself is unreadable. Unreadable nested
    /// rows are dropped with their subtrees; their siblings are kept.
    fn try_from(row: ModuleRow) -> Result<Self, Self::Error> {
        let (record, children) = row.into_parts().map_err(AccessError::InvalidEntry)?;
        Ok(match children {
            None => ModuleEntry::Flat(record),
            Some(rows) => {
                let parent = record.id;
                let children = rows
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, raw)| match ModuleEntry::deserialize(raw) {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            warn!(parent_id = parent, index = i, error = %e, "skipping unreadable nested module");
                            None
                        }
                    })
                    .collect();
                ModuleEntry::Tree { record, children }
            }
        })
    }
}

impl From<ModuleRecord> for ModuleEntry {
    fn from(record: ModuleRecord) -> Self {
        ModuleEntry::Flat(record)
    }
}

/// Flatten entries in pre-order. Nesting is authoritative: a nested
/// child's `parent_id` is set to the entry that contains it.
pub fn flatten_entries(entries: Vec<ModuleEntry>) -> Vec<ModuleRecord> {
    let mut out = Vec::new();
    let mut stack: Vec<(ModuleEntry, Option<ModuleId>)> =
        entries.into_iter().rev().map(|e| (e, None)).collect();

    while let Some((entry, nested_in)) = stack.pop() {
        let (mut record, children) = match entry {
            ModuleEntry::Flat(record) => (record, Vec::new()),
            ModuleEntry::Tree { record, children } => (record, children),
        };
        if nested_in.is_some() {
            record.parent_id = nested_in;
        }
        let id = record.id;
        out.push(record);
        stack.extend(children.into_iter().rev().map(|c| (c, Some(id))));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_without_children_is_flat() {
        let entry: ModuleEntry = serde_json::from_value(json!({
            "pk_module_id": 1,
            "name": "Documents",
            "url": "/master/documents",
            "fk_parent_id": 9
        }))
        .unwrap();
        assert!(matches!(entry, ModuleEntry::Flat(_)));
        assert_eq!(entry.record().parent_id, Some(9));
    }

    #[test]
    fn nested_children_get_parent_from_nesting() {
        let entry: ModuleEntry = serde_json::from_value(json!({
            "pk_module_id": 1,
            "name": "Settings",
            "children": [
                { "pk_module_id": 2, "name": "Roles", "fk_parent_id": 77,
                  "children": [ { "pk_module_id": 3, "name": "Grants" } ] },
                { "pk_module_id": 4, "name": "Users" }
            ]
        }))
        .unwrap();

        let flat = flatten_entries(vec![entry]);
        let shape: Vec<_> = flat.iter().map(|r| (r.id, r.parent_id)).collect();
        assert_eq!(
            shape,
            vec![(1, None), (2, Some(1)), (3, Some(2)), (4, Some(1))]
        );
    }

    #[test]
    fn entry_without_id_fails() {
        let err = serde_json::from_value::<ModuleEntry>(json!({ "name": "x", "children": [] }))
            .unwrap_err();
        assert!(err.to_string().contains("pk_module_id"));
    }

    #[test]
    fn unreadable_child_is_dropped_and_siblings_kept() {
        let entry: ModuleEntry = serde_json::from_value(json!({
            "pk_module_id": 1,
            "name": "Settings",
            "children": [
                { "pk_module_id": 2, "name": "Roles",
                  "children": [ { "name": "grandchild, no id" } ] },
                { "name": "broken, no id" },
                "garbage",
                { "pk_module_id": "x", "name": "bad id" },
                { "pk_module_id": 3, "name": "Users" }
            ]
        }))
        .unwrap();

        let ids: Vec<_> = flatten_entries(vec![entry]).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
