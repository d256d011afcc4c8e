//! Core types and utilities for the price oracle
//!
//! This crate provides shared types used across all components:
//! - Price quotes and proxy responses
//! - Oracle events
//! - Error taxonomy
//! - Service configuration

pub mod types;
pub mod events;
pub mod config;
pub mod errors;

pub use types::*;
pub use events::*;
pub use self::config::*;
pub use errors::*;

// Re-exported so downstream crates share one primitives version
pub use alloy_primitives::{Address, U256};
