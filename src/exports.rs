//! Export access control entry point
//!
//! [`NfsExports`] is built once per gateway configuration and shared by all
//! request handlers. Construction compiles the host list eagerly, so a
//! malformed configuration never yields a usable instance.

use crate::access_control::{
    AccessPrivilege, AccessResolver, CacheStats, Clock, DecisionCache, HostGroup, RuleSet,
    SystemClock,
};
use crate::config::ExportsConfig;
use crate::error::Result;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Export access control with a per-address decision cache
#[derive(Debug)]
pub struct NfsExports {
    resolver: AccessResolver,
    cache: DecisionCache,
}

impl NfsExports {
    /// Create from cache bounds and an export host list
    pub fn new(cache_size: usize, cache_ttl: Duration, hosts: &str) -> Result<Self> {
        Self::with_clock(cache_size, cache_ttl, hosts, Arc::new(SystemClock))
    }

    /// Create with an explicit time source for cache expiry
    pub fn with_clock(
        cache_size: usize,
        cache_ttl: Duration,
        hosts: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let resolver = AccessResolver::new(hosts)?;
        info!(
            rules = resolver.rules().len(),
            cache_size,
            ?cache_ttl,
            "Export access control initialized"
        );

        Ok(Self {
            resolver,
            cache: DecisionCache::with_clock(cache_size, cache_ttl, clock),
        })
    }

    /// Create from the `[exports]` configuration section
    pub fn from_config(config: &ExportsConfig) -> Result<Self> {
        Self::new(
            config.cache_size,
            config.cache_expiry(),
            &config.allowed_hosts,
        )
    }

    /// Decide the privilege of a client
    ///
    /// A cached decision for `address` is returned as is, even if `hostname`
    /// differs from the one it was computed with.
    pub fn access_privilege(&self, address: &str, hostname: &str) -> AccessPrivilege {
        if let Some(privilege) = self.cache.get(address) {
            return privilege;
        }

        let privilege = self.resolver.resolve(address, hostname);
        debug!(address, hostname, privilege = %privilege, "Resolved export access");
        self.cache.put(address, privilege);
        privilege
    }

    pub fn access_privilege_for(&self, address: IpAddr, hostname: &str) -> AccessPrivilege {
        self.access_privilege(&address.to_string(), hostname)
    }

    /// Host groups in declaration order, as listed to mounting clients
    pub fn host_groups(&self) -> Vec<HostGroup> {
        self.resolver.rules().host_groups()
    }

    pub fn rules(&self) -> &RuleSet {
        self.resolver.rules()
    }

    pub fn resolver(&self) -> &AccessResolver {
        &self.resolver
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::ManualClock;

    #[test]
    fn test_wildcard() {
        let exports = NfsExports::new(16, Duration::from_secs(60), "* rw").unwrap();
        assert_eq!(
            exports.access_privilege("192.168.0.12", "a.b.com"),
            AccessPrivilege::ReadWrite
        );
    }

    #[test]
    fn test_cache_ignores_hostname() {
        let exports = NfsExports::new(16, Duration::from_secs(60), "a.b.com rw").unwrap();
        assert_eq!(
            exports.access_privilege("10.0.0.1", "a.b.com"),
            AccessPrivilege::ReadWrite
        );
        assert_eq!(
            exports.access_privilege("10.0.0.1", "c.d.org"),
            AccessPrivilege::ReadWrite
        );
        assert_eq!(
            exports.access_privilege("10.0.0.2", "c.d.org"),
            AccessPrivilege::None
        );

        let stats = exports.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn test_expired_decision_is_recomputed() {
        let clock = Arc::new(ManualClock::new());
        let exports =
            NfsExports::with_clock(16, Duration::from_secs(1), "a.b.com rw", clock.clone())
                .unwrap();

        assert_eq!(
            exports.access_privilege("10.0.0.1", "a.b.com"),
            AccessPrivilege::ReadWrite
        );
        clock.advance(Duration::from_secs(2));
        assert_eq!(
            exports.access_privilege("10.0.0.1", "c.d.org"),
            AccessPrivilege::None
        );
    }

    #[test]
    fn test_access_privilege_for_ip() {
        let exports = NfsExports::new(16, Duration::from_secs(60), "2001:db8::/32 rw").unwrap();
        let address: IpAddr = "2001:db8::7".parse().unwrap();
        assert_eq!(
            exports.access_privilege_for(address, "host"),
            AccessPrivilege::ReadWrite
        );
    }

    #[test]
    fn test_from_config() {
        let exports = NfsExports::from_config(&ExportsConfig::default()).unwrap();
        assert_eq!(exports.rules().len(), 1);
        assert_eq!(exports.cache_stats().capacity, 512);
    }

    #[test]
    fn test_very_long_ttl() {
        let exports = NfsExports::new(16, Duration::MAX, "a.b.com rw").unwrap();
        assert_eq!(
            exports.access_privilege("10.0.0.1", "a.b.com"),
            AccessPrivilege::ReadWrite
        );
        assert_eq!(
            exports.access_privilege("10.0.0.1", "c.d.org"),
            AccessPrivilege::ReadWrite
        );
        assert_eq!(exports.cache_stats().hits, 1);
    }

    #[test]
    fn test_malformed_configuration() {
        assert!(NfsExports::new(16, Duration::from_secs(60), "foo#bar").is_err());
    }
}
