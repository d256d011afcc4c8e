//! Price proxy contract and address resolution

use alloy_primitives::Address;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use oracle_core::{ProxyResponse, ProxyResult};

/// External price-feed endpoint queried for two pairs at a time.
///
/// Implementations must be read-only: the oracle may call them any number of
/// times, in any order, and never caches the answers.
#[async_trait::async_trait]
pub trait PriceProxy: Send + Sync {
    async fn get_prices_by_pair_names(
        &self,
        pair_a: &str,
        pair_b: &str,
    ) -> ProxyResult<ProxyResponse>;

    /// Human-readable label for logs
    fn label(&self) -> &str;
}

/// Maps registered proxy addresses to clients
pub trait ProxyDirectory: Send + Sync {
    fn resolve(&self, address: &Address) -> Option<Arc<dyn PriceProxy>>;
}

/// Directory backed by a fixed map, built at start-up
#[derive(Clone, Default)]
pub struct StaticDirectory {
    clients: HashMap<Address, Arc<dyn PriceProxy>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: Address, client: Arc<dyn PriceProxy>) {
        self.clients.insert(address, client);
    }

    pub fn with(mut self, address: Address, client: Arc<dyn PriceProxy>) -> Self {
        self.insert(address, client);
        self
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ProxyDirectory for StaticDirectory {
    fn resolve(&self, address: &Address) -> Option<Arc<dyn PriceProxy>> {
        self.clients.get(address).cloned()
    }
}

impl fmt::Debug for StaticDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.clients.iter().map(|(addr, client)| (addr, client.label())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedPriceProxy;

    #[test]
    fn test_static_directory_resolves_registered_clients() {
        let addr = Address::with_last_byte(1);
        let directory = StaticDirectory::new().with(addr, Arc::new(FixedPriceProxy::new("primary")));

        assert_eq!(directory.len(), 1);
        assert_eq!(directory.resolve(&addr).map(|c| c.label().to_string()), Some("primary".to_string()));
        assert!(directory.resolve(&Address::with_last_byte(2)).is_none());
    }
}
