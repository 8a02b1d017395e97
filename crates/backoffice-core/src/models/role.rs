//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::app::AppItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleItem {
    #[serde(rename = "pk_role_id")]
    pub id: i64,
    pub name: String,
    /// Application the role belongs to.
    #[serde(rename = "fk_apps_id", default)]
    pub app_id: Option<i64>,
    #[serde(default)]
    pub app: Option<AppItem>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(rename = "created_date", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updated_date", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
    #[serde(rename = "fk_apps_id", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
    pub description: Option<String>,
    pub active: Option<bool>,
}
