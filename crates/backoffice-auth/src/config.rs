//! Authentication configuration.

/// Configuration for the auth payload cache.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Key the login payload is cached under (default: `gn_auth`).
    pub storage_key: String,
    /// Application id sent as `X-APP-ID` on every API request.
    pub app_id: Option<String>,
    /// Treat a cached payload whose token has expired as logged out.
    pub enforce_token_expiry: bool,
    /// Clock skew tolerated when checking `exp`, in seconds (default: 30).
    pub token_leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            storage_key: "gn_auth".into(),
            app_id: None,
            enforce_token_expiry: true,
            token_leeway_secs: 30,
        }
    }
}
