//! Access control module
//!
//! Decides which privilege a client gets on an export.
//!
//! ## Rule Model
//!
//! The export host list is an ordered list of clauses, each a host
//! specification with an optional `rw`/`ro` privilege (read-only by default):
//!
//! ```text
//! 192.168.0.0/22 rw; 10.0.0.0/255.0.0.0; [a-z]+.example.com rw; *
//! ```
//!
//! Host specifications are, in order of interpretation:
//! - `*` - every client
//! - `address/prefix` or `address/netmask` - clients in that network
//! - a plain name or address without dots or pattern syntax - exact match
//! - anything else - a regular expression that must match the whole client
//!   address or the whole hostname. Dots are not escaped.
//!
//! The first clause covering a client decides its privilege. Clients covered
//! by no clause get no access.
//!
//! ## Caching
//!
//! Decisions are cached per client address (not per hostname) with a bounded
//! size and a time-to-live, see [`DecisionCache`].

pub mod cache;
pub mod patterns;
pub mod resolver;
pub mod rules;
pub mod types;

pub use cache::{CacheStats, Clock, DecisionCache, ManualClock, SystemClock};
pub use patterns::HostMatcher;
pub use resolver::AccessResolver;
pub use rules::{HostGroup, Rule, RuleSet};
pub use types::AccessPrivilege;
