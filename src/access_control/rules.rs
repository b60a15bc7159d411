//! Export rule compilation
//!
//! An export host list is a sequence of clauses separated by `;` (or
//! newlines). Each clause is a host specification optionally followed by a
//! privilege token:
//!
//! ```text
//! 192.168.0.0/22 rw; *.example.com; 10.0.0.0/255.0.0.0 ro
//! ```
//!
//! A missing privilege token means read-only. Compilation is all or
//! nothing: a single malformed clause rejects the whole list.

use crate::access_control::patterns::HostMatcher;
use crate::access_control::types::AccessPrivilege;
use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// A single compiled export clause
#[derive(Debug, Clone)]
pub struct Rule {
    host: String,
    matcher: HostMatcher,
    privilege: AccessPrivilege,
}

impl Rule {
    /// Parse one clause, `host [rw|ro]`
    pub fn parse(clause: &str) -> Result<Self, ConfigError> {
        let tokens: Vec<&str> = clause.split_whitespace().collect();

        let (host, privilege) = match tokens.as_slice() {
            [host] => (*host, AccessPrivilege::ReadOnly),
            [host, option] => {
                let privilege = AccessPrivilege::from_token(option).ok_or_else(|| {
                    ConfigError::invalid_clause(
                        clause,
                        format!("unknown access option '{}', expected 'rw' or 'ro'", option),
                    )
                })?;
                (*host, privilege)
            }
            [] => return Err(ConfigError::invalid_clause(clause, "missing host")),
            _ => {
                return Err(ConfigError::invalid_clause(
                    clause,
                    "expected a host optionally followed by 'rw' or 'ro'",
                ));
            }
        };

        Ok(Self {
            host: host.to_string(),
            matcher: HostMatcher::parse(host)?,
            privilege,
        })
    }

    /// Host specification as written in the configuration
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn matcher(&self) -> &HostMatcher {
        &self.matcher
    }

    pub fn privilege(&self) -> AccessPrivilege {
        self.privilege
    }

    /// Check whether the client is covered by this rule
    pub fn matches(&self, address: &str, hostname: &str) -> bool {
        self.matcher.matches(address, hostname)
    }
}

/// Host group as reported to clients listing the exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostGroup {
    pub host: String,
    pub privilege: AccessPrivilege,
}

/// Renders the group back in clause form, e.g. `192.168.0.0/22 rw`
impl fmt::Display for HostGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.privilege.token() {
            Some(token) => write!(f, "{} {}", self.host, token),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Ordered, immutable list of export rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile an export host list
    ///
    /// Clauses keep their declaration order, which is also their evaluation
    /// order. Empty clauses are skipped.
    ///
    /// A list with no clauses at all compiles to an empty rule set, which
    /// denies every client.
    pub fn compile(hosts: &str) -> Result<Self, ConfigError> {
        let rules = hosts
            .split([';', '\n'])
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(Rule::parse)
            .collect::<Result<Vec<_>, _>>()?;

        for (index, rule) in rules.iter().enumerate() {
            debug!(
                index,
                host = rule.host(),
                kind = rule.matcher().kind(),
                privilege = %rule.privilege(),
                "Compiled export rule"
            );
        }

        if rules.is_empty() {
            warn!("Export host list has no clauses, every client is denied");
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Host specifications with their privileges, in declaration order
    pub fn host_groups(&self) -> Vec<HostGroup> {
        self.rules
            .iter()
            .map(|rule| HostGroup {
                host: rule.host.clone(),
                privilege: rule.privilege,
            })
            .collect()
    }
}
