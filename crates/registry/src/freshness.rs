//! Quote freshness policy

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use oracle_core::{OracleError, OracleResult, PriceQuote, Timestamp};

/// Maximum tolerated age of a quote, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessPolicy {
    acceptable_delay: u64,
}

impl FreshnessPolicy {
    pub fn new(acceptable_delay: u64) -> OracleResult<Self> {
        if acceptable_delay == 0 {
            return Err(OracleError::ZeroDelay);
        }
        Ok(Self { acceptable_delay })
    }

    pub fn acceptable_delay(&self) -> u64 {
        self.acceptable_delay
    }

    /// Returns the previous delay
    pub fn set_acceptable_delay(&mut self, seconds: u64) -> OracleResult<u64> {
        if seconds == 0 {
            return Err(OracleError::ZeroDelay);
        }
        Ok(std::mem::replace(&mut self.acceptable_delay, seconds))
    }

    pub fn is_fresh(&self, quote: &PriceQuote, now: Timestamp) -> bool {
        quote.age(now) <= self.acceptable_delay
    }

    /// Fails with the token and publish time of a stale quote
    pub fn ensure_fresh(&self, token: Address, quote: &PriceQuote, now: Timestamp) -> OracleResult<()> {
        if self.is_fresh(quote, now) {
            Ok(())
        } else {
            Err(OracleError::PriceExpired {
                token,
                publish_time: quote.publish_time,
            })
        }
    }
}
