//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role reference embedded in a user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSummary {
    #[serde(rename = "pk_role_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "pk_user_id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub roles: Vec<RoleSummary>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "fk_employee_id", default)]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Raw password; hashing is the backend's job.
    pub password: String,
    #[serde(rename = "role_ids", default)]
    pub roles: Vec<i64>,
    pub active: bool,
}

fn default_active() -> bool {
    true
}
