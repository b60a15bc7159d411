//! Access control types
//!
//! Core types used by the export access control system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access granted to a client for an export
///
/// Variants are ordered by permissiveness, so `None < ReadOnly < ReadWrite`.
/// Rule evaluation never combines privileges; it picks the first match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessPrivilege {
    /// No access
    #[default]
    None,
    /// Read-only access
    #[serde(alias = "ro")]
    ReadOnly,
    /// Read-write access
    #[serde(alias = "rw")]
    ReadWrite,
}

impl AccessPrivilege {
    /// Get the privilege name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccessPrivilege::None => "none",
            AccessPrivilege::ReadOnly => "read_only",
            AccessPrivilege::ReadWrite => "read_write",
        }
    }

    /// Parse the privilege token of an export clause (`rw` or `ro`)
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("rw") {
            Some(AccessPrivilege::ReadWrite)
        } else if token.eq_ignore_ascii_case("ro") {
            Some(AccessPrivilege::ReadOnly)
        } else {
            None
        }
    }

    /// Short token used in export clauses, `None` has no token
    pub const fn token(&self) -> Option<&'static str> {
        match self {
            AccessPrivilege::None => None,
            AccessPrivilege::ReadOnly => Some("ro"),
            AccessPrivilege::ReadWrite => Some("rw"),
        }
    }
}

impl fmt::Display for AccessPrivilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
