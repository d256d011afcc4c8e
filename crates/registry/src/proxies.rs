//! Ordered price proxy registry
//!
//! Positions are 1-based; position 0 means "not registered". Removal swaps the
//! last entry into the vacated slot, so it is O(1) but reorders the list. The
//! best proxy is held by address: it keeps its designation and failover
//! priority, and its position changes only when it was the last entry.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use oracle_core::{OracleError, OracleResult};

/// Registry of price proxies with one designated best proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyRegistry {
    /// `list[p - 1]` holds the proxy at position `p`
    list: Vec<Address>,
    /// proxy -> 1-based position
    positions: HashMap<Address, usize>,
    best: Option<Address>,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `proxy`; returns its position
    pub fn add(&mut self, proxy: Address) -> OracleResult<usize> {
        if proxy == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }
        if self.contains(&proxy) {
            return Err(OracleError::ProxyAlreadyExists(proxy));
        }

        self.list.push(proxy);
        let position = self.list.len();
        self.positions.insert(proxy, position);
        Ok(position)
    }

    /// Swap-with-last removal
    pub fn remove(&mut self, proxy: Address) -> OracleResult<()> {
        if proxy == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }
        let position = self.index_of(&proxy);
        if position == 0 {
            return Err(OracleError::ProxyNotFound(proxy));
        }
        if self.best == Some(proxy) {
            return Err(OracleError::CannotRemoveBestProxy(proxy));
        }

        let slot = position - 1;
        self.list.swap_remove(slot);
        if let Some(moved) = self.list.get(slot) {
            self.positions.insert(*moved, position);
        }
        self.positions.remove(&proxy);
        Ok(())
    }

    /// Designate `proxy` as best; returns the previous best
    pub fn select_best(&mut self, proxy: Address) -> OracleResult<Option<Address>> {
        if proxy == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }
        if !self.contains(&proxy) {
            return Err(OracleError::ProxyNotFound(proxy));
        }
        Ok(self.best.replace(proxy))
    }

    pub fn best(&self) -> Option<Address> {
        self.best
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Proxy at 1-based `position`
    pub fn at(&self, position: usize) -> Option<Address> {
        position.checked_sub(1).and_then(|slot| self.list.get(slot).copied())
    }

    /// 1-based position of `proxy`, 0 if absent
    pub fn index_of(&self, proxy: &Address) -> usize {
        self.positions.get(proxy).copied().unwrap_or(0)
    }

    pub fn contains(&self, proxy: &Address) -> bool {
        self.positions.contains_key(proxy)
    }

    /// Proxies in position order
    pub fn proxies(&self) -> &[Address] {
        &self.list
    }

    /// Query order: best proxy first, then every other proxy by position
    pub fn failover_order(&self) -> Vec<Address> {
        let mut order = Vec::with_capacity(self.list.len());
        if let Some(best) = self.best {
            order.push(best);
        }
        order.extend(self.list.iter().copied().filter(|p| Some(*p) != self.best));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn proxy(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    /// `list[indexOf(a)] == a` and `indexOf(list[i]) == i` for every entry
    fn assert_consistent(registry: &ProxyRegistry) {
        assert_eq!(registry.positions.len(), registry.list.len());
        for position in 1..=registry.len() {
            let addr = registry.at(position).unwrap();
            assert_eq!(registry.index_of(&addr), position);
        }
        for (addr, position) in &registry.positions {
            assert_eq!(registry.at(*position), Some(*addr));
        }
    }

    #[test]
    fn test_add_appends_with_one_based_position() {
        let mut registry = ProxyRegistry::new();
        assert_eq!(registry.add(proxy(10)).unwrap(), 1);
        assert_eq!(registry.add(proxy(11)).unwrap(), 2);
        assert_eq!(registry.add(proxy(1)).unwrap(), 3);

        assert_eq!(registry.at(3), Some(proxy(1)));
        assert_eq!(registry.index_of(&proxy(1)), 3);
        assert_eq!(registry.index_of(&proxy(1)), registry.len());
        assert_eq!(registry.at(0), None);
        assert_eq!(registry.at(4), None);
    }

    #[test]
    fn test_add_rejects_zero_and_duplicates() {
        let mut registry = ProxyRegistry::new();
        assert_eq!(registry.add(Address::ZERO), Err(OracleError::ZeroAddress));

        registry.add(proxy(1)).unwrap();
        assert_eq!(registry.add(proxy(1)), Err(OracleError::ProxyAlreadyExists(proxy(1))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_moves_last_into_slot() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(10)).unwrap();
        registry.add(proxy(11)).unwrap();
        registry.add(proxy(1)).unwrap();
        registry.add(proxy(2)).unwrap();

        registry.remove(proxy(1)).unwrap();

        assert_eq!(registry.index_of(&proxy(1)), 0);
        assert_eq!(registry.index_of(&proxy(2)), 3);
        assert_eq!(registry.at(3), Some(proxy(2)));
        assert_eq!(registry.len(), 3);
        assert_consistent(&registry);
    }

    #[test]
    fn test_remove_last_entry() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(10)).unwrap();
        registry.add(proxy(11)).unwrap();
        registry.add(proxy(1)).unwrap();

        registry.remove(proxy(1)).unwrap();

        assert_eq!(registry.index_of(&proxy(11)), 2);
        assert_eq!(registry.proxies(), &[proxy(10), proxy(11)]);
        assert_consistent(&registry);
    }

    #[test]
    fn test_remove_rejects_zero_missing_and_best() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(10)).unwrap();
        registry.add(proxy(11)).unwrap();
        registry.select_best(proxy(11)).unwrap();

        assert_eq!(registry.remove(Address::ZERO), Err(OracleError::ZeroAddress));
        assert_eq!(registry.remove(proxy(1)), Err(OracleError::ProxyNotFound(proxy(1))));
        assert_eq!(
            registry.remove(proxy(11)),
            Err(OracleError::CannotRemoveBestProxy(proxy(11)))
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_removing_other_entry_keeps_best_position() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(10)).unwrap();
        registry.add(proxy(11)).unwrap();
        registry.add(proxy(12)).unwrap();
        registry.select_best(proxy(10)).unwrap();

        registry.remove(proxy(11)).unwrap();

        assert_eq!(registry.best(), Some(proxy(10)));
        assert_eq!(registry.index_of(&proxy(10)), 1);
    }

    #[test]
    fn test_best_proxy_in_last_slot_moves_on_removal() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(1)).unwrap();
        registry.add(proxy(2)).unwrap();
        registry.add(proxy(3)).unwrap();
        registry.select_best(proxy(3)).unwrap();

        registry.remove(proxy(1)).unwrap();

        // designation and failover priority follow the address, not the slot
        assert_eq!(registry.best(), Some(proxy(3)));
        assert_eq!(registry.index_of(&proxy(3)), 1);
        assert_eq!(registry.at(1), Some(proxy(3)));
        assert_eq!(registry.failover_order(), vec![proxy(3), proxy(2)]);
        assert_consistent(&registry);
    }

    #[test]
    fn test_select_best_requires_membership() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(10)).unwrap();

        assert_eq!(registry.select_best(proxy(99)), Err(OracleError::ProxyNotFound(proxy(99))));
        assert_eq!(registry.select_best(Address::ZERO), Err(OracleError::ZeroAddress));
        assert_eq!(registry.select_best(proxy(10)), Ok(None));
        assert_eq!(registry.best(), Some(proxy(10)));
    }

    #[test]
    fn test_failover_order_starts_at_best() {
        let mut registry = ProxyRegistry::new();
        registry.add(proxy(10)).unwrap();
        registry.add(proxy(11)).unwrap();
        registry.add(proxy(12)).unwrap();

        assert_eq!(registry.failover_order(), vec![proxy(10), proxy(11), proxy(12)]);

        registry.select_best(proxy(11)).unwrap();
        assert_eq!(registry.failover_order(), vec![proxy(11), proxy(10), proxy(12)]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Remove(u8),
        SelectBest(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16).prop_map(Op::Add),
            (0u8..16).prop_map(Op::Remove),
            (0u8..16).prop_map(Op::SelectBest),
        ]
    }

    proptest! {
        #[test]
        fn prop_positions_stay_consistent(ops in proptest::collection::vec(op(), 0..64)) {
            let mut registry = ProxyRegistry::new();

            for op in ops {
                let before = registry.len();
                match op {
                    Op::Add(n) => {
                        let added = registry.add(proxy(n)).is_ok();
                        prop_assert_eq!(registry.len(), before + added as usize);
                    }
                    Op::Remove(n) => {
                        let target = proxy(n);
                        let removable = n != 0
                            && registry.contains(&target)
                            && registry.best() != Some(target);
                        let best_before = registry.best();
                        let best_position = best_before.map(|b| registry.index_of(&b));
                        let target_position = registry.index_of(&target);

                        prop_assert_eq!(registry.remove(target).is_ok(), removable);
                        prop_assert_eq!(registry.best(), best_before);
                        if removable {
                            prop_assert_eq!(registry.len(), before - 1);
                            prop_assert_eq!(registry.index_of(&target), 0);

                            if let (Some(best), Some(position)) = (best_before, best_position) {
                                // only the last entry moves, into the vacated slot
                                let expected = if position == before {
                                    target_position
                                } else {
                                    position
                                };
                                prop_assert_eq!(registry.index_of(&best), expected);
                            }
                        } else if let (Some(best), Some(position)) = (best_before, best_position) {
                            prop_assert_eq!(registry.index_of(&best), position);
                        }
                    }
                    Op::SelectBest(n) => {
                        let _ = registry.select_best(proxy(n));
                    }
                }
                assert_consistent(&registry);
                if let Some(best) = registry.best() {
                    prop_assert!(registry.contains(&best));
                }
            }
        }
    }
}
