use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct SecurityConfig {
    #[serde(default = "crate::config::defaults::default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default = "crate::config::defaults::default_metrics_allow_private_only")]
    pub metrics_allow_private_only: bool,
    #[serde(default)]
    pub metrics_admin_token: Option<String>,
    /// Upper bound on an uploaded import file.
    #[serde(default = "crate::config::defaults::default_import_max_bytes")]
    pub import_max_bytes: usize,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("metrics_allow_private_only", &self.metrics_allow_private_only)
            .field(
                "metrics_admin_token",
                &self.metrics_admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("import_max_bytes", &self.import_max_bytes)
            .finish()
    }
}
