//! Application domain model.

use serde::{Deserialize, Serialize};

/// A client application registered with the backend. Roles are scoped
/// to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppItem {
    #[serde(rename = "pk_app_id")]
    pub id: i64,
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApp {
    pub name: String,
    pub key: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}
