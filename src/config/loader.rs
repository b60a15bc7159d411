//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Explicit overrides (e.g. `--hosts` on the command line)
//! 2. Environment variables (NFS_EXPORTS_*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::access_control::RuleSet;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "nfs-exports.toml",
    "~/.config/nfs-exports/config.toml",
    "/etc/nfs-exports/config.toml",
];

/// Environment variable prefix, nested keys use `__`
/// (e.g. NFS_EXPORTS_EXPORTS__ALLOWED_HOSTS)
const ENV_PREFIX: &str = "NFS_EXPORTS";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    load_config_with_hosts(config_path, None)
}

/// Load configuration, replacing the export host list when `hosts` is given
///
/// Validation runs on the final configuration, so a malformed host list in
/// the file does not fail the load when it is overridden.
pub fn load_config_with_hosts(
    config_path: Option<&str>,
    hosts: Option<&str>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        let expanded = shellexpand::tilde(path);
        if !Path::new(expanded.as_ref()).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with NFS_EXPORTS_ prefix
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Explicit overrides
    builder = builder
        .set_override_option("exports.allowed_hosts", hosts.map(str::to_string))
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
///
/// The host list is compiled here as well so that a malformed list fails at
/// load time rather than when the exports are first consulted.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.exports.cache_size == 0 {
        return Err(ConfigError::Invalid {
            message: "exports.cache_size must be greater than 0".to_string(),
        });
    }

    if config.exports.cache_expiry_ms == 0 {
        return Err(ConfigError::Invalid {
            message: "exports.cache_expiry_ms must be greater than 0".to_string(),
        });
    }

    RuleSet::compile(&config.exports.allowed_hosts)?;

    Ok(())
}
