//! Configuration types for nfs-exports
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;
use std::time::Duration;

/// Default export host list, every client gets read-write access
pub const DEFAULT_ALLOWED_HOSTS: &str = "* rw";

/// Default maximum number of cached access decisions
pub const DEFAULT_CACHE_SIZE: usize = 512;

/// Default lifetime of a cached access decision (15 minutes)
pub const DEFAULT_CACHE_EXPIRY_MS: u64 = 15 * 60 * 1000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Export access control settings
    pub exports: ExportsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Export access control configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportsConfig {
    /// Host list, e.g. `"192.168.0.0/22 rw; *.example.com"`
    pub allowed_hosts: String,

    /// Maximum number of cached access decisions
    pub cache_size: usize,

    /// Lifetime of a cached access decision in milliseconds
    pub cache_expiry_ms: u64,
}

impl Default for ExportsConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: DEFAULT_ALLOWED_HOSTS.to_string(),
            cache_size: DEFAULT_CACHE_SIZE,
            cache_expiry_ms: DEFAULT_CACHE_EXPIRY_MS,
        }
    }
}

impl ExportsConfig {
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_millis(self.cache_expiry_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.exports.allowed_hosts, "* rw");
        assert_eq!(config.exports.cache_size, 512);
        assert_eq!(config.exports.cache_expiry(), Duration::from_secs(900));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_exports_section() {
        let config: ExportsConfig =
            serde_json::from_str(r#"{"allowed_hosts": "10.0.0.0/8 rw"}"#).unwrap();
        assert_eq!(config.allowed_hosts, "10.0.0.0/8 rw");
        assert_eq!(config.cache_size, DEFAULT_CACHE_SIZE);
        assert_eq!(config.cache_expiry_ms, DEFAULT_CACHE_EXPIRY_MS);
    }
}
