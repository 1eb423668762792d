//! Runtime server settings
//!
//! Layered loading: optional file source (TOML/YAML/JSON), then
//! environment variables with the `GEOROUTE_` prefix (e.g.
//! `GEOROUTE_SERVER__PORT=9000`).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level runtime settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub routing: RoutingSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    5_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Routing engine wiring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Domain configuration document; built-in defaults when absent
    #[serde(default)]
    pub domain_config: Option<String>,
    /// Field inventory document (endpoint id -> available fields);
    /// every configured field is assumed present when absent
    #[serde(default)]
    pub inventory: Option<String>,
    /// Semantic similarity service URL; keyword-only when absent
    #[serde(default)]
    pub semantic_url: Option<String>,
    #[serde(default = "default_semantic_timeout")]
    pub semantic_timeout_ms: u64,
}

fn default_semantic_timeout() -> u64 {
    300
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            domain_config: None,
            inventory: None,
            semantic_url: None,
            semantic_timeout_ms: default_semantic_timeout(),
        }
    }
}

/// Load settings from an optional file plus the environment
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }
    builder = builder.add_source(
        config::Environment::with_prefix("GEOROUTE")
            .separator("__")
            .try_parsing(true),
    );

    builder.build()?.try_deserialize().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.server.cors_enabled);
        assert_eq!(settings.routing.semantic_timeout_ms, 300);
        assert!(settings.routing.semantic_url.is_none());
    }

    #[test]
    fn test_load_without_file() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
    }
}
