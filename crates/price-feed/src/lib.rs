//! Price proxy clients
//!
//! Features:
//! - `PriceProxy` trait: the two-pair query contract every upstream feed implements
//! - Address to client resolution for registered proxies
//! - HTTP JSON client
//! - In-memory fixed-answer proxy for tests and local setups

pub mod proxy;
pub mod http;
pub mod fixed;

pub use proxy::{PriceProxy, ProxyDirectory, StaticDirectory};
pub use http::HttpPriceProxy;
pub use fixed::FixedPriceProxy;
