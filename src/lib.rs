//! NFS Export Access Control
//!
//! Decides whether a client connecting to an NFS gateway may access an
//! export, and with which privilege.
//!
//! ## Features
//!
//! - **Ordered host rules** with wildcard, exact, CIDR and regex host specifications
//! - **First match wins**, clients matching no rule get no access
//! - **Bounded decision cache** keyed by client address, with LRU eviction and a TTL
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Example Configuration
//!
//! ```toml
//! [exports]
//! allowed_hosts = "192.168.0.0/22 rw; [a-z]+.example.com; 10.0.0.0/255.0.0.0 ro"
//! cache_size = 512
//! cache_expiry_ms = 900000
//! ```
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use nfs_exports::{AccessPrivilege, NfsExports};
//!
//! let exports = NfsExports::new(512, Duration::from_secs(900), "192.168.0.0/22 rw").unwrap();
//! assert_eq!(
//!     exports.access_privilege("192.168.0.12", "a.b.com"),
//!     AccessPrivilege::ReadWrite
//! );
//! assert_eq!(
//!     exports.access_privilege("10.0.0.12", "a.b.com"),
//!     AccessPrivilege::None
//! );
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod exports;

// Re-export main types
pub use access_control::AccessPrivilege;
pub use config::{AppConfig, load_config};
pub use error::{ConfigError, Result};
pub use exports::NfsExports;
