//! Configuration loading from TOML.
//!
//! Reads `config.toml` (or the path in `DEVIG_CONFIG`) and deserializes into
//! strongly-typed structs. Every section has defaults so a missing file still
//! yields a usable configuration.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::DevigMethod;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "DEVIG_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS origins. A `*` inside a pattern matches any run of characters,
    /// e.g. `https://*.vercel.app`.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:3000".into(),
                "https://*.vercel.app".into(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Method used when a request doesn't name one.
    pub default_devig_method: DevigMethod,
    /// Kelly multiplier used when a request doesn't supply one.
    pub default_kelly_fraction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_devig_method: DevigMethod::WorstCase,
            default_kelly_fraction: 0.5,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Config path from `DEVIG_CONFIG`, else `config.toml`.
    pub fn resolve_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let fraction = self.engine.default_kelly_fraction;
        if !fraction.is_finite() || fraction <= 0.0 {
            bail!("engine.default_kelly_fraction must be positive, got {fraction}");
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        // Only meaningful when run from the crate root.
        let result = AppConfig::load("config.toml");
        if let Ok(cfg) = result {
            assert_eq!(cfg.server.port, 8000);
            assert_eq!(cfg.engine.default_devig_method, DevigMethod::WorstCase);
            assert!(cfg.engine.default_kelly_fraction > 0.0);
            assert!(cfg.server.allowed_origins.iter().any(|o| o.contains('*')));
        }
    }

    #[test]
    fn test_from_toml_full() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9100
            allowed_origins = ["https://example.com"]

            [engine]
            default_devig_method = "power"
            default_kelly_fraction = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind_address(), "0.0.0.0:9100");
        assert_eq!(cfg.server.allowed_origins, vec!["https://example.com".to_string()]);
        assert_eq!(cfg.engine.default_devig_method, DevigMethod::Power);
        assert_eq!(cfg.engine.default_kelly_fraction, 0.25);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.bind_address(), "127.0.0.1:8000");
        assert_eq!(cfg.engine.default_devig_method, DevigMethod::WorstCase);
        assert_eq!(cfg.engine.default_kelly_fraction, 0.5);
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [engine]
            default_devig_method = "shin"
            default_kelly_fraction = 0.5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_fraction_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [engine]
            default_devig_method = "additive"
            default_kelly_fraction = 0.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let cfg = AppConfig::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(cfg.server.port, 8000);
    }
}
