//! Module (menu) domain model.
//!
//! A module is a navigable feature of the console. The backend sends
//! modules either flat (`fk_parent_id` references) or pre-nested
//! (`children` arrays); [`ModuleRow`] is the wire shape that accepts
//! both, and [`ModuleRecord`] is the normalized record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::permission::{Action, PermissionRecord};

pub type ModuleId = i64;

/// Route-like strings a module governs.
///
/// `url` is the single route of flat records; the `url_*` fields are
/// the per-action routes of tree records. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "url_view", default)]
    pub view: Option<String>,
    #[serde(rename = "url_create", default)]
    pub create: Option<String>,
    #[serde(rename = "url_detail", default)]
    pub detail: Option<String>,
    #[serde(rename = "url_update", default)]
    pub update: Option<String>,
    #[serde(rename = "url_delete", default)]
    pub delete: Option<String>,
    #[serde(rename = "url_approval", default)]
    pub approval: Option<String>,
    #[serde(rename = "url_activation", default)]
    pub activation: Option<String>,
}

impl ModuleUrls {
    /// Module whose only route is its view URL.
    pub fn view(url: impl Into<String>) -> Self {
        Self {
            view: Some(url.into()),
            ..Self::default()
        }
    }

    /// Route registered for `action`. `View` falls back to the legacy
    /// single `url`.
    pub fn get(&self, action: Action) -> Option<&str> {
        let slot = match action {
            Action::View => self.view.as_ref().or(self.url.as_ref()),
            Action::Add => self.create.as_ref(),
            Action::Detail => self.detail.as_ref(),
            Action::Update => self.update.as_ref(),
            Action::Delete => self.delete.as_ref(),
            Action::Approval => self.approval.as_ref(),
            Action::Activation => self.activation.as_ref(),
        };
        slot.map(String::as_str).filter(|s| !s.trim().is_empty())
    }

    /// Non-blank route strings, legacy `url` first.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        [
            &self.url,
            &self.view,
            &self.create,
            &self.detail,
            &self.update,
            &self.delete,
            &self.approval,
            &self.activation,
        ]
        .into_iter()
        .filter_map(|u| u.as_deref())
        .filter(|u| !u.trim().is_empty())
    }
}

/// One row of the access hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModuleRow")]
pub struct ModuleRecord {
    #[serde(rename = "pk_module_id")]
    pub id: ModuleId,
    pub name: String,
    /// `None` means root level.
    pub parent_id: Option<ModuleId>,
    #[serde(flatten)]
    pub urls: ModuleUrls,
    /// Permission entry of the current user's role, if any. Written as
    /// a one-element list, the way the backend sends it.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "permission_list"
    )]
    pub permissions: Option<PermissionRecord>,
    pub icon: Option<String>,
    pub ordering: Option<i64>,
    pub active: Option<bool>,
    pub description: Option<String>,
}

impl ModuleRecord {
    pub fn new(id: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            urls: ModuleUrls::default(),
            permissions: None,
            icon: None,
            ordering: None,
            active: None,
            description: None,
        }
    }

    pub fn with_parent(mut self, parent_id: ModuleId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_urls(mut self, urls: ModuleUrls) -> Self {
        self.urls = urls;
        self
    }

    pub fn with_permissions(mut self, permissions: PermissionRecord) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

/// A module with its direct children embedded, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleNode {
    #[serde(flatten)]
    pub record: ModuleRecord,
    pub children: Vec<ModuleNode>,
}

impl ModuleNode {
    pub fn leaf(record: ModuleRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ModuleNode::subtree_len).sum::<usize>()
    }
}

/// Pre-order traversal over a forest: a node is yielded before its
/// children, siblings in input order.
pub struct PreOrder<'a> {
    stack: Vec<&'a ModuleNode>,
}

impl<'a> PreOrder<'a> {
    pub fn forest(roots: &'a [ModuleNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ModuleNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Wire shape of a module as the backend sends it, flat or nested.
///
/// Ids may arrive as numbers or numeric strings. When both the plain
/// and the `pk_`/`fk_` spellings are present the prefixed one wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub pk_module_id: Option<ModuleId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<ModuleId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub fk_parent_id: Option<ModuleId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub parent_id: Option<ModuleId>,
    #[serde(flatten)]
    pub urls: ModuleUrls,
    #[serde(default, deserialize_with = "one_or_many")]
    pub permissions: Option<Vec<PermissionRecord>>,
    /// Nested rows, kept raw so one unreadable child cannot fail its
    /// parent.
    #[serde(default)]
    pub children: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub ordering: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModuleRow {
    pub fn module_id(&self) -> Option<ModuleId> {
        self.pk_module_id.or(self.id)
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.fk_parent_id.or(self.parent_id)
    }

    /// Split into the normalized record and the raw nested children, if
    /// the row carried any. Only the first permission entry is kept.
    pub fn into_parts(self) -> Result<(ModuleRecord, Option<Vec<serde_json::Value>>), String> {
        let id = self
            .module_id()
            .ok_or_else(|| "module row has no pk_module_id".to_string())?;
        let parent_id = self.parent();
        let record = ModuleRecord {
            id,
            name: self.name.unwrap_or_default(),
            parent_id,
            urls: self.urls,
            permissions: self.permissions.and_then(|p| p.into_iter().next()),
            icon: self.icon,
            ordering: self.ordering,
            active: self.active,
            description: self.description,
        };
        Ok((record, self.children))
    }
}

impl TryFrom<ModuleRow> for ModuleRecord {
    type Error = String;

    fn try_from(row: ModuleRow) -> Result<Self, Self::Error> {
        row.into_parts().map(|(record, _)| record)
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<ModuleId>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("id out of range: {n}"))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("id is not numeric: {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("unexpected id value: {other}"))),
    }
}

fn permission_list<S>(permissions: &Option<PermissionRecord>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    permissions.as_slice().serialize(serializer)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<PermissionRecord>),
    One(PermissionRecord),
}

/// Permission entries as a list, or a single bare entry.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<PermissionRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::Many(entries)) => Some(entries),
        Some(OneOrMany::One(entry)) => Some(vec![entry]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidates_skip_blank_urls() {
        let urls = ModuleUrls {
            url: Some("  ".into()),
            view: Some("/settings/role-management".into()),
            create: Some("/settings/role-management/add".into()),
            delete: Some(String::new()),
            ..ModuleUrls::default()
        };
        let got: Vec<_> = urls.candidates().collect();
        assert_eq!(
            got,
            vec!["/settings/role-management", "/settings/role-management/add"]
        );
    }

    #[test]
    fn view_route_falls_back_to_legacy_url() {
        let urls = ModuleUrls {
            url: Some("/master/documents".into()),
            ..ModuleUrls::default()
        };
        assert_eq!(urls.get(Action::View), Some("/master/documents"));
        assert_eq!(urls.get(Action::Add), None);
    }

    #[test]
    fn record_parses_backend_row() {
        let record: ModuleRecord = serde_json::from_value(json!({
            "pk_module_id": "7",
            "name": "Documents",
            "fk_parent_id": 1,
            "url_view": "/master/documents",
            "permissions": [
                { "is_view": true, "is_add": true },
                { "is_view": true, "is_delete": true }
            ],
            "icon": null
        }))
        .unwrap();

        assert_eq!(record.id, 7);
        assert_eq!(record.parent_id, Some(1));
        assert_eq!(record.urls.view.as_deref(), Some("/master/documents"));
        let perms = record.permissions.unwrap();
        assert!(perms.can_add);
        assert!(!perms.can_delete);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let err = serde_json::from_value::<ModuleRecord>(json!({ "name": "Orphan" })).unwrap_err();
        assert!(err.to_string().contains("pk_module_id"));
    }

    #[test]
    fn prefixed_parent_wins_over_plain() {
        let row: ModuleRow = serde_json::from_value(json!({
            "id": 3,
            "parent_id": 1,
            "fk_parent_id": 2
        }))
        .unwrap();
        assert_eq!(row.module_id(), Some(3));
        assert_eq!(row.parent(), Some(2));
    }

    #[test]
    fn pre_order_visits_parent_before_children() {
        let tree = ModuleNode {
            record: ModuleRecord::new(1, "Settings"),
            children: vec![
                ModuleNode {
                    record: ModuleRecord::new(2, "Roles").with_parent(1),
                    children: vec![ModuleNode::leaf(ModuleRecord::new(4, "Grants").with_parent(2))],
                },
                ModuleNode::leaf(ModuleRecord::new(3, "Users").with_parent(1)),
            ],
        };
        let ids: Vec<_> = PreOrder::forest(std::slice::from_ref(&tree))
            .map(|n| n.record.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
        assert_eq!(tree.subtree_len(), 4);
    }

    #[test]
    fn record_with_permissions_reads_back() {
        let record = ModuleRecord::new(1, "Docs")
            .with_parent(4)
            .with_urls(ModuleUrls::view("/master/documents"))
            .with_permissions(PermissionRecord {
                can_view: true,
                can_delete: true,
                ..PermissionRecord::NONE
            });

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["permissions"].is_array());
        let back: ModuleRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn bare_permission_object_is_accepted() {
        let record: ModuleRecord = serde_json::from_value(json!({
            "pk_module_id": 2,
            "name": "Roles",
            "permissions": { "is_view": 1, "is_add": 1 }
        }))
        .unwrap();
        assert!(record.permissions.is_some_and(|p| p.can_add));
    }
}
