//! Module-role access assignments.

use serde::{Deserialize, Serialize};

use super::module::{ModuleId, ModuleRecord};
use super::permission::PermissionRecord;

/// Grants a role a set of flags on one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessItem {
    #[serde(rename = "pk_modulerole_id")]
    pub id: i64,
    #[serde(rename = "fk_module_id")]
    pub module_id: ModuleId,
    #[serde(rename = "fk_role_id")]
    pub role_id: i64,
    #[serde(flatten)]
    pub permissions: PermissionRecord,
    #[serde(default)]
    pub module: Option<ModuleRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccess {
    #[serde(rename = "fk_module_id")]
    pub module_id: ModuleId,
    #[serde(rename = "fk_role_id")]
    pub role_id: i64,
    #[serde(flatten)]
    pub permissions: PermissionRecord,
}
