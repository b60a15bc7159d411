//! Error types for nfs-exports
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API.
//! Access decisions themselves never fail: anything that cannot be matched
//! simply does not match, so only construction and loading produce errors.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Incorrectly formatted export clause '{clause}': {reason}")]
    InvalidClause { clause: String, reason: String },

    #[error("Invalid host specification '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Invalid network '{network}': {reason}")]
    InvalidNetwork { network: String, reason: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ConfigError {
    pub fn invalid_clause(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidClause {
            clause: clause.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_host(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHost {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_network(network: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNetwork {
            network: network.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for configuration loading and rule compilation
pub type Result<T> = std::result::Result<T, ConfigError>;
