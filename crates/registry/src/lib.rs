//! Oracle registries
//!
//! Synchronous, in-memory state owned by the oracle:
//! - Token to pair-name mapping
//! - Ordered price proxy list with a best proxy
//! - Quote freshness policy

pub mod pairs;
pub mod proxies;
pub mod freshness;

pub use pairs::{PairChange, PairRegistry};
pub use proxies::ProxyRegistry;
pub use freshness::FreshnessPolicy;
