//! Permission flags granted to a role on a module.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An action a module can expose in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Add,
    Detail,
    Update,
    Delete,
    Approval,
    Activation,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::View,
        Action::Add,
        Action::Detail,
        Action::Update,
        Action::Delete,
        Action::Approval,
        Action::Activation,
    ];

    /// Actions rendered as per-row buttons in CRUD tables.
    pub const ROW: [Action; 3] = [Action::Detail, Action::Update, Action::Delete];
}

/// Per-module, per-role capability flags.
///
/// Read-only from the console's perspective: it is a projection of the
/// server-side module-role assignment carried in the auth payload.
/// Flags absent or `null` on the wire deserialize as `false`; tinyint
/// backends send `0`/`1`, as numbers or strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    #[serde(rename = "is_view", default, deserialize_with = "lenient_flag")]
    pub can_view: bool,
    #[serde(rename = "is_add", default, deserialize_with = "lenient_flag")]
    pub can_add: bool,
    #[serde(rename = "is_detail", default, deserialize_with = "lenient_flag")]
    pub can_detail: bool,
    #[serde(rename = "is_update", default, deserialize_with = "lenient_flag")]
    pub can_update: bool,
    #[serde(rename = "is_delete", default, deserialize_with = "lenient_flag")]
    pub can_delete: bool,
    #[serde(rename = "is_approval", default, deserialize_with = "lenient_flag")]
    pub can_approve: bool,
    #[serde(rename = "is_activation", default, deserialize_with = "lenient_flag")]
    pub can_activate: bool,
}

impl PermissionRecord {
    /// Record used when no module (or no permission entry) applies:
    /// visible, not actionable.
    pub const FALLBACK: PermissionRecord = PermissionRecord {
        can_view: true,
        can_add: false,
        can_detail: false,
        can_update: false,
        can_delete: false,
        can_approve: false,
        can_activate: false,
    };

    pub const NONE: PermissionRecord = PermissionRecord {
        can_view: false,
        can_add: false,
        can_detail: false,
        can_update: false,
        can_delete: false,
        can_approve: false,
        can_activate: false,
    };

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.can_view,
            Action::Add => self.can_add,
            Action::Detail => self.can_detail,
            Action::Update => self.can_update,
            Action::Delete => self.can_delete,
            Action::Approval => self.can_approve,
            Action::Activation => self.can_activate,
        }
    }

    /// Every granted action, in [`Action::ALL`] order.
    pub fn granted(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.allows(*a))
            .collect()
    }

    /// Granted per-row actions (view detail, edit, delete).
    pub fn row_actions(&self) -> Vec<Action> {
        Action::ROW
            .into_iter()
            .filter(|a| self.allows(*a))
            .collect()
    }
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "" | "0" | "false" => Ok(false),
            _ => Err(D::Error::custom(format!("unexpected flag value: {s:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("unexpected flag value: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_visible_but_not_actionable() {
        let p = PermissionRecord::FALLBACK;
        assert!(p.allows(Action::View));
        assert_eq!(p.granted(), vec![Action::View]);
    }

    #[test]
    fn missing_flags_deserialize_as_false() {
        let p: PermissionRecord =
            serde_json::from_str(r#"{"is_view": true, "is_add": true}"#).unwrap();
        assert!(p.can_view);
        assert!(p.can_add);
        assert!(!p.can_update);
        assert!(!p.can_activate);
    }

    #[test]
    fn wire_names_are_preserved_on_output() {
        let p = PermissionRecord {
            can_approve: true,
            can_activate: true,
            ..PermissionRecord::NONE
        };
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["is_approval"], true);
        assert_eq!(json["is_activation"], true);
        assert!(json.get("can_view").is_none());
    }

    #[test]
    fn row_actions_only_cover_detail_update_delete() {
        let p = PermissionRecord {
            can_detail: true,
            can_delete: true,
            can_approve: true,
            ..PermissionRecord::NONE
        };
        assert_eq!(p.row_actions(), vec![Action::Detail, Action::Delete]);
    }

    #[test]
    fn null_flags_read_as_false() {
        let p: PermissionRecord = serde_json::from_str(
            r#"{"is_view": true, "is_add": true, "is_update": null}"#,
        )
        .unwrap();
        assert!(p.can_view);
        assert!(p.can_add);
        assert!(!p.can_update);
    }

    #[test]
    fn tinyint_flags_are_accepted() {
        let p: PermissionRecord = serde_json::from_str(
            r#"{"is_view": 1, "is_add": 1, "is_delete": 0, "is_detail": "1", "is_approval": "0"}"#,
        )
        .unwrap();
        assert_eq!(p.granted(), vec![Action::View, Action::Add, Action::Detail]);
    }

    #[test]
    fn unreadable_flag_is_rejected() {
        let err = serde_json::from_str::<PermissionRecord>(r#"{"is_view": "maybe"}"#).unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }
}
