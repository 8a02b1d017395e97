//! The cached login result.

use backoffice_access::{AccessContext, AccessError};
use backoffice_core::models::module::ModuleRow;
use backoffice_core::models::user::RoleSummary;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::AuthResult;

/// Login result as returned by the backend and cached for the session.
///
/// A read-only snapshot: the access context is derived from it, never
/// written back. A `null` user or token reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: AuthUser,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
}

/// Identity part of the payload. Everything is optional because the
/// backend's user object is loosely shaped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "pk_user_id", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<RoleSummary>,
    /// Raw module access entries. A missing or non-array value reads
    /// as an empty list.
    #[serde(default, deserialize_with = "lenient_list")]
    pub module_access: Vec<Value>,
}

impl AuthPayload {
    pub fn from_json(raw: &str) -> AuthResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> AuthResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Module access entries that parse as module rows; the rest are
    /// skipped with a warning.
    pub fn module_rows(&self) -> Vec<ModuleRow> {
        self.user
            .module_access
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| match ModuleRow::deserialize(raw) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(index = i, error = %e, "unreadable module access entry");
                    None
                }
            })
            .collect()
    }

    pub fn try_access_context(&self) -> Result<AccessContext, AccessError> {
        AccessContext::try_from_rows(self.module_rows())
    }

    /// Access context of this payload. Module data that cannot form a
    /// forest degrades to an empty context, so every lookup falls back
    /// to view-only.
    pub fn access_context(&self) -> AccessContext {
        self.try_access_context().unwrap_or_else(|e| {
            warn!(error = %e, "module access list rejected, using empty access context");
            AccessContext::empty()
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            warn!(kind = value_kind(&other), "module_access is not an array, ignoring");
            Vec::new()
        }
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
