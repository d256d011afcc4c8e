//! Persistent oracle state

use alloy_primitives::Address;

use oracle_core::{FailoverConfig, OracleError, OracleResult};
use oracle_registry::{FreshnessPolicy, PairRegistry, ProxyRegistry};

/// Everything an administrative operation may mutate.
///
/// Each registry mutator validates its input completely before writing, so a
/// rejected operation leaves the state as it was.
#[derive(Debug, Clone)]
pub struct OracleState {
    pub pairs: PairRegistry,
    pub proxies: ProxyRegistry,
    pub freshness: FreshnessPolicy,
    pub failover: FailoverConfig,
    /// `None` once administration has been renounced
    pub administrator: Option<Address>,
}

impl OracleState {
    pub fn new(administrator: Address, acceptable_delay: u64) -> OracleResult<Self> {
        if administrator == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }

        Ok(Self {
            pairs: PairRegistry::new(),
            proxies: ProxyRegistry::new(),
            freshness: FreshnessPolicy::new(acceptable_delay)?,
            failover: FailoverConfig::default(),
            administrator: Some(administrator),
        })
    }

    pub fn ensure_administrator(&self, caller: Address) -> OracleResult<()> {
        match self.administrator {
            Some(admin) if admin == caller => Ok(()),
            _ => Err(OracleError::Unauthorized(caller)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_check() {
        let admin = Address::with_last_byte(0xaa);
        let mut state = OracleState::new(admin, 120).unwrap();

        assert!(state.ensure_administrator(admin).is_ok());
        assert_eq!(
            state.ensure_administrator(Address::with_last_byte(1)),
            Err(OracleError::Unauthorized(Address::with_last_byte(1)))
        );

        state.administrator = None;
        assert!(state.ensure_administrator(admin).is_err());
    }

    #[test]
    fn test_new_rejects_zero_values() {
        assert_eq!(OracleState::new(Address::ZERO, 120).unwrap_err(), OracleError::ZeroAddress);
        assert_eq!(
            OracleState::new(Address::with_last_byte(1), 0).unwrap_err(),
            OracleError::ZeroDelay
        );
    }
}
