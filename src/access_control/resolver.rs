//! Export access resolver
//!
//! Walks the compiled rules in declaration order. The first rule whose host
//! specification covers the client decides the privilege; later rules are
//! never consulted, even if they would grant more. A client that matches no
//! rule gets no access.

use crate::access_control::rules::{Rule, RuleSet};
use crate::access_control::types::AccessPrivilege;
use crate::error::ConfigError;
use tracing::trace;

/// Access resolver over an immutable rule set
#[derive(Debug, Clone, Default)]
pub struct AccessResolver {
    rules: RuleSet,
}

impl AccessResolver {
    /// Create a resolver from an export host list
    pub fn new(hosts: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_rules(RuleSet::compile(hosts)?))
    }

    pub fn from_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Find the rule that decides access for a client
    pub fn find_match(&self, address: &str, hostname: &str) -> Option<&Rule> {
        self.rules
            .rules()
            .iter()
            .find(|rule| rule.matches(address, hostname))
    }

    /// Resolve the privilege of a client
    pub fn resolve(&self, address: &str, hostname: &str) -> AccessPrivilege {
        match self.find_match(address, hostname) {
            Some(rule) => {
                trace!(
                    address,
                    hostname,
                    host = rule.host(),
                    privilege = %rule.privilege(),
                    "Matched export rule"
                );
                rule.privilege()
            }
            None => {
                trace!(address, hostname, "No export rule matched");
                AccessPrivilege::None
            }
        }
    }
}
