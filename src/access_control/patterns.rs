//! Host matching for export rules
//!
//! Each export clause names its clients with a host specification. The
//! specification is turned into a [`HostMatcher`] once, when the rule set is
//! compiled, and afterwards only answers whether a client address or
//! hostname satisfies it.

use crate::error::ConfigError;
use ipnet::IpNet;
use regex::Regex;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// Characters that may appear in a literal host name or address
fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')
}

/// Characters that may additionally appear in a host pattern
fn is_pattern_char(c: char) -> bool {
    is_host_char(c)
        || matches!(
            c,
            '.' | '*' | '?' | '+' | '[' | ']' | '(' | ')' | '{' | '}' | '|' | '^' | '$' | '\\' | ','
        )
}

/// Compiled host specification
#[derive(Debug, Clone)]
pub enum HostMatcher {
    /// `*`, matches every client
    Any,
    /// A literal name or address with no pattern syntax
    Exact(String),
    /// A network in CIDR or dotted-netmask form, matches addresses only
    Cidr(IpNet),
    /// A fully anchored regular expression tried against address and hostname
    Pattern(Regex),
}

impl HostMatcher {
    /// Parse a host specification token
    ///
    /// Interpretation order is `*`, then `address/prefix` or
    /// `address/netmask`, then a literal host, then a pattern. Dots in a
    /// pattern are not escaped, so `192.168.0.1` matches `192.168.001` too.
    pub fn parse(host: &str) -> Result<Self, ConfigError> {
        if host.is_empty() {
            return Err(ConfigError::invalid_host(host, "empty host specification"));
        }

        if host == "*" {
            return Ok(HostMatcher::Any);
        }

        if let Some((address, mask)) = host.split_once('/')
            && let Ok(address) = address.parse::<IpAddr>()
        {
            return Self::parse_network(host, address, mask).map(HostMatcher::Cidr);
        }

        if host.chars().all(is_host_char) {
            return Ok(HostMatcher::Exact(host.to_string()));
        }

        if let Some(c) = host.chars().find(|c| !is_pattern_char(*c)) {
            return Err(ConfigError::invalid_host(
                host,
                format!("unexpected character '{}'", c),
            ));
        }

        let regex = Regex::new(&format!("^(?:{})$", host)).map_err(|e| {
            ConfigError::InvalidPattern {
                pattern: host.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(HostMatcher::Pattern(regex))
    }

    /// Build a network from an address and either a prefix length or a
    /// dotted IPv4 netmask. Host bits of the address are cleared.
    fn parse_network(spec: &str, address: IpAddr, mask: &str) -> Result<IpNet, ConfigError> {
        let prefix_len = if !mask.is_empty() && mask.bytes().all(|b| b.is_ascii_digit()) {
            mask.parse::<u8>()
                .map_err(|_| ConfigError::invalid_network(spec, "prefix length out of range"))?
        } else {
            let netmask = mask
                .parse::<Ipv4Addr>()
                .map_err(|_| ConfigError::invalid_network(spec, "invalid netmask"))?;
            if !address.is_ipv4() {
                return Err(ConfigError::invalid_network(
                    spec,
                    "dotted netmask requires an IPv4 address",
                ));
            }
            netmask_prefix_len(netmask)
                .ok_or_else(|| ConfigError::invalid_network(spec, "netmask is not contiguous"))?
        };

        IpNet::new(address, prefix_len)
            .map(|net| net.trunc())
            .map_err(|_| ConfigError::invalid_network(spec, "prefix length out of range"))
    }

    /// Check whether a client matches this specification
    ///
    /// Addresses that do not parse never match a network; they are not an
    /// error.
    pub fn matches(&self, address: &str, hostname: &str) -> bool {
        match self {
            HostMatcher::Any => true,
            HostMatcher::Exact(host) => address == host || hostname == host,
            HostMatcher::Cidr(net) => address
                .parse::<IpAddr>()
                .map(|ip| net.contains(&ip))
                .unwrap_or(false),
            HostMatcher::Pattern(regex) => regex.is_match(address) || regex.is_match(hostname),
        }
    }

    /// Short name of the matcher kind, for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            HostMatcher::Any => "any",
            HostMatcher::Exact(_) => "exact",
            HostMatcher::Cidr(_) => "cidr",
            HostMatcher::Pattern(_) => "pattern",
        }
    }
}

impl fmt::Display for HostMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostMatcher::Any => write!(f, "*"),
            HostMatcher::Exact(host) => write!(f, "{}", host),
            HostMatcher::Cidr(net) => write!(f, "{}", net),
            HostMatcher::Pattern(regex) => write!(f, "{}", regex.as_str()),
        }
    }
}

/// Prefix length of a contiguous netmask, `None` if the mask has holes
fn netmask_prefix_len(netmask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(netmask);
    let ones = bits.leading_ones();
    match bits.checked_shl(ones) {
        Some(rest) if rest != 0 => None,
        _ => Some(ones as u8),
    }
}
