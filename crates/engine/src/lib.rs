//! Price oracle engine
//!
//! Ties the registries and price proxies together:
//! - Administrator-gated, all-or-nothing state changes with an event journal
//! - Failover quote querying across registered proxies
//! - Cross-rate conversion in 256-bit fixed point

pub mod rate;
pub mod querier;
pub mod state;
pub mod oracle;

pub use oracle::{Conversion, PriceOracle};
pub use querier::FailoverQuerier;
pub use rate::{cross_rate_amount, rescale_amount};
pub use state::OracleState;
