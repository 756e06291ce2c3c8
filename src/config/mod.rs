pub mod auth_config;
pub mod database_config;
pub mod defaults;
pub mod repair_config;
pub mod security_config;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

pub use auth_config::{AuthConfig, ConfigError};
pub use database_config::DatabaseConfig;
pub use repair_config::RepairConfig;
pub use security_config::SecurityConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "defaults::default_host")]
    pub host: String,
    #[serde(default = "defaults::default_port")]
    pub port: u16,
    #[serde(default = "defaults::default_environment")]
    pub environment: String,
    /// Base URL printed into asset QR payloads.
    #[serde(default = "defaults::default_public_url")]
    pub public_url: String,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub repair: RepairConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "defaults::default_logging_level")]
    pub level: String,
    #[serde(default = "defaults::default_logging_json_format")]
    pub json_format: bool,
}

/// `DATABASE_URL` lands on `database.url`, `REPAIR_UTC_OFFSET_MINUTES` on
/// `repair.utc_offset_minutes`, and so on.
const SECTION_PREFIXES: [(&str, &str); 5] = [
    ("DATABASE_", "database"),
    ("AUTH_", "auth"),
    ("SECURITY_", "security"),
    ("LOGGING_", "logging"),
    ("REPAIR_", "repair"),
];

impl AppConfig {
    pub fn from_env() -> Result<Self, Box<figment::Error>> {
        let mut figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Toml::file("config/development.toml").nested())
            .merge(Env::prefixed("APP_").split("__"));

        for (prefix, section) in SECTION_PREFIXES {
            figment = figment.merge(
                Env::prefixed(prefix).map(move |key| format!("{section}.{key}").into()),
            );
        }

        let mut config: Self = figment
            .merge(
                Env::raw()
                    .only(&["JWT_SECRET", "PUBLIC_URL"])
                    .map(|key| match key.as_str() {
                        "JWT_SECRET" => "auth.jwt_secret".into(),
                        "PUBLIC_URL" => "public_url".into(),
                        _ => key.into(),
                    }),
            )
            .extract()
            .map_err(Box::new)?;

        config.security.metrics_admin_token =
            defaults::normalize_optional_string(config.security.metrics_admin_token);
        config.public_url = config.public_url.trim().trim_end_matches('/').to_string();

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let jwt_secret = self.auth.jwt_secret.trim();
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be set via environment variable".to_string(),
            ));
        }

        if jwt_secret == "change-me-in-production" {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be set to a secure value, not the default placeholder".to_string(),
            ));
        }

        if !(self.public_url.starts_with("http://") || self.public_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "public_url must be an absolute http(s) URL".to_string(),
            ));
        }

        self.repair.validate()
    }
}
