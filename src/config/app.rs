//! Application configuration loading from config.toml
//!
//! Every section is optional; missing sections fall back to defaults suitable for a
//! local development server. A handful of environment variables (typically set via
//! `.env`) override the file so secrets do not have to live in it.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Token signing settings
    pub auth: AuthSettings,
    /// Database settings
    pub database: DatabaseSettings,
    /// Departments to create on startup if their `dept_no` is missing
    pub departments: Vec<DepartmentSeed>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port; `SERVER_PORT` overrides it
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Settings for issuing and validating login tokens
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC secret for HS256 tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "personnel-transfer-dev-secret".to_string(),
            token_ttl_hours: 24,
            issuer: "personnel-transfer-api".to_string(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL; `DATABASE_URL` overrides it
    pub url: Option<String>,
}

/// Configuration for a single seeded department
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentSeed {
    /// Unique department code
    pub dept_no: String,
    /// Display name
    pub name: String,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {:?}: {e}", path.as_ref()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {:?}: {e}", path.as_ref()),
    })
}

/// Loads configuration from `APP_CONFIG` (or ./config.toml) and applies environment
/// overrides.
///
/// A missing file is not an error: defaults are used instead. A file that exists but
/// does not parse is.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

    let mut config = if Path::new(&path).exists() {
        debug!("Loading configuration from {}", path);
        load_config(&path)?
    } else {
        warn!("Config file {} not found, using defaults", path);
        AppConfig::default()
    };

    apply_env_overrides(&mut config)?;
    info!(
        port = config.server.port,
        seeded_departments = config.departments.len(),
        "Configuration loaded"
    );
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = Some(url);
    }
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }
    if let Ok(port) = std::env::var("SERVER_PORT") {
        config.server.port = port.parse().map_err(|e| Error::Config {
            message: format!("SERVER_PORT must be a port number: {e}"),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            cors_allowed_origins = ["http://localhost:5173"]

            [auth]
            jwt_secret = "s3cret"
            token_ttl_hours = 8
            issuer = "hr"

            [database]
            url = "sqlite::memory:"

            [[departments]]
            dept_no = "D1"
            name = "Sales"

            [[departments]]
            dept_no = "D7"
            name = "Engineering"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_allowed_origins.len(), 1);
        assert_eq!(config.auth.token_ttl_hours, 8);
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.departments.len(), 2);
        assert_eq!(config.departments[1].name, "Engineering");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.database.url.is_none());
        assert!(config.departments.is_empty());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
