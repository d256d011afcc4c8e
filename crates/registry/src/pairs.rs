//! Token to price-pair-name registry

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use oracle_core::{OracleError, OracleResult, PricePair};

/// Outcome of a pair registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairChange {
    pub token: Address,
    /// Empty when the token had no name before
    pub old_name: String,
    pub new_name: String,
}

/// Bidirectional token <-> pair name mapping.
///
/// A name belongs to at most one token. Re-registering a token releases its
/// previous name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairRegistry {
    names: HashMap<Address, String>,
    owners: HashMap<String, Address>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update the pair name of `token`
    pub fn set_pair(&mut self, token: Address, name: &str) -> OracleResult<PairChange> {
        if token == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }
        if name.is_empty() {
            return Err(OracleError::EmptyPairName);
        }
        if let Some(owner) = self.owners.get(name) {
            if *owner != token {
                return Err(OracleError::PairAlreadyExists {
                    name: name.to_string(),
                    owner: *owner,
                });
            }
        }

        let old_name = self
            .names
            .insert(token, name.to_string())
            .unwrap_or_default();
        if !old_name.is_empty() && old_name != name {
            self.owners.remove(&old_name);
        }
        self.owners.insert(name.to_string(), token);

        Ok(PairChange {
            token,
            old_name,
            new_name: name.to_string(),
        })
    }

    /// Pair name of `token`, empty if unregistered
    pub fn get_pair(&self, token: &Address) -> &str {
        self.names.get(token).map(String::as_str).unwrap_or("")
    }

    /// Token owning `name`
    pub fn token_of(&self, name: &str) -> Option<Address> {
        self.owners.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All registrations, sorted by token
    pub fn pairs(&self) -> Vec<PricePair> {
        let mut pairs: Vec<PricePair> = self
            .names
            .iter()
            .map(|(token, name)| PricePair {
                token: *token,
                name: name.clone(),
            })
            .collect();
        pairs.sort_by_key(|p| p.token);
        pairs
    }
}
