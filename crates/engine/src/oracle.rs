//! Price oracle facade
//!
//! Administrative entry points take the caller's address explicitly and run
//! as one all-or-nothing unit. Conversions are planned against the current
//! state and then executed without borrowing it, so proxy I/O never holds
//! the state.

use alloy_primitives::{Address, U256};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use oracle_core::{
    OracleConfig, OracleError, OracleEvent, OracleResult, PricePair, Timestamp,
};
use oracle_price_feed::ProxyDirectory;
use oracle_registry::{FreshnessPolicy, PairChange};

use crate::querier::FailoverQuerier;
use crate::rate::{cross_rate_amount, rescale_amount};
use crate::state::OracleState;

/// Price oracle: registries, administrator and the proxy directory
pub struct PriceOracle {
    state: OracleState,
    directory: Arc<dyn ProxyDirectory>,
    events: Vec<OracleEvent>,
}

impl PriceOracle {
    pub fn new(
        administrator: Address,
        acceptable_delay: u64,
        directory: Arc<dyn ProxyDirectory>,
    ) -> OracleResult<Self> {
        Ok(Self {
            state: OracleState::new(administrator, acceptable_delay)?,
            directory,
            events: vec![],
        })
    }

    /// Build from configuration, applying pairs, proxies and the best proxy
    /// through the regular administrator-gated operations
    pub fn from_config(config: &OracleConfig, directory: Arc<dyn ProxyDirectory>) -> OracleResult<Self> {
        config.validate()?;

        let mut oracle = Self::new(config.administrator, config.acceptable_delay_secs, directory)?;
        oracle.state.failover = config.failover.clone();

        let admin = config.administrator;
        for pair in &config.pairs {
            oracle.set_pair(admin, pair.token, &pair.name)?;
        }
        for proxy in &config.proxies {
            oracle.add_proxy(admin, proxy.address)?;
        }
        if let Some(best) = config.best_proxy {
            oracle.select_best_proxy(admin, best)?;
        }

        info!(
            "Oracle configured: {} pairs, {} proxies, acceptable delay {}s",
            oracle.state.pairs.len(),
            oracle.state.proxies.len(),
            oracle.acceptable_delay()
        );
        Ok(oracle)
    }

    /// Run `op` for the administrator; its events reach the journal only on success.
    ///
    /// `op` must finish every check before its first write to the state, which
    /// holds for all registry operations, so a rejected call leaves no trace.
    fn transact<T>(
        &mut self,
        caller: Address,
        operation: &'static str,
        op: impl FnOnce(&mut OracleState, &mut Vec<OracleEvent>) -> OracleResult<T>,
    ) -> OracleResult<T> {
        let mut events = vec![];
        let outcome = match self.state.ensure_administrator(caller) {
            Ok(()) => op(&mut self.state, &mut events),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                for event in &events {
                    info!(
                        target: "audit",
                        event = event.name(),
                        caller = %caller,
                        details = ?event,
                        "Oracle state updated"
                    );
                }
                self.events.extend(events);
                Ok(value)
            }
            Err(e) => {
                warn!(
                    target: "audit",
                    operation,
                    caller = %caller,
                    error = %e,
                    "Oracle operation rejected"
                );
                Err(e)
            }
        }
    }

    // ---- administrative surface ----

    pub fn set_pair(&mut self, caller: Address, token: Address, name: &str) -> OracleResult<PairChange> {
        self.transact(caller, "set_pair", |state, events| {
            let change = state.pairs.set_pair(token, name)?;
            events.push(OracleEvent::NewPricePair {
                token: change.token,
                old_name: change.old_name.clone(),
                new_name: change.new_name.clone(),
            });
            Ok(change)
        })
    }

    /// Returns the new proxy's 1-based position
    pub fn add_proxy(&mut self, caller: Address, proxy: Address) -> OracleResult<usize> {
        self.transact(caller, "add_proxy", |state, events| {
            let position = state.proxies.add(proxy)?;
            events.push(OracleEvent::AddPriceProxy { proxy });
            Ok(position)
        })
    }

    pub fn remove_proxy(&mut self, caller: Address, proxy: Address) -> OracleResult<()> {
        self.transact(caller, "remove_proxy", |state, events| {
            state.proxies.remove(proxy)?;
            events.push(OracleEvent::RemovePriceProxy { proxy });
            Ok(())
        })
    }

    pub fn select_best_proxy(&mut self, caller: Address, proxy: Address) -> OracleResult<()> {
        self.transact(caller, "select_best_proxy", |state, events| {
            let previous = state.proxies.select_best(proxy)?;
            events.push(OracleEvent::NewBestPriceProxy {
                previous: previous.unwrap_or(Address::ZERO),
                proxy,
            });
            Ok(())
        })
    }

    pub fn set_acceptable_delay(&mut self, caller: Address, seconds: u64) -> OracleResult<()> {
        self.transact(caller, "set_acceptable_delay", |state, events| {
            let old_delay = state.freshness.set_acceptable_delay(seconds)?;
            events.push(OracleEvent::NewAcceptableDelay {
                old_delay,
                new_delay: seconds,
            });
            Ok(())
        })
    }

    pub fn transfer_administration(&mut self, caller: Address, new_admin: Address) -> OracleResult<()> {
        self.transact(caller, "transfer_administration", |state, events| {
            if new_admin == Address::ZERO {
                return Err(OracleError::ZeroAddress);
            }
            state.administrator = Some(new_admin);
            events.push(OracleEvent::AdministrationTransferred {
                previous: caller,
                new_admin,
            });
            Ok(())
        })
    }

    /// Irreversible: every later administrative call fails
    pub fn renounce_administration(&mut self, caller: Address) -> OracleResult<()> {
        self.transact(caller, "renounce_administration", |state, events| {
            state.administrator = None;
            events.push(OracleEvent::AdministrationTransferred {
                previous: caller,
                new_admin: Address::ZERO,
            });
            Ok(())
        })
    }

    // ---- read surface ----

    /// Pair name of `token`, empty if unregistered
    pub fn get_pair(&self, token: &Address) -> &str {
        self.state.pairs.get_pair(token)
    }

    pub fn pairs(&self) -> Vec<PricePair> {
        self.state.pairs.pairs()
    }

    pub fn proxy_count(&self) -> usize {
        self.state.proxies.len()
    }

    /// Proxy at 1-based `position`
    pub fn proxy_at(&self, position: usize) -> Option<Address> {
        self.state.proxies.at(position)
    }

    /// 1-based position of `proxy`, 0 if absent
    pub fn proxy_index(&self, proxy: &Address) -> usize {
        self.state.proxies.index_of(proxy)
    }

    pub fn proxies(&self) -> &[Address] {
        self.state.proxies.proxies()
    }

    pub fn best_proxy(&self) -> Option<Address> {
        self.state.proxies.best()
    }

    pub fn acceptable_delay(&self) -> u64 {
        self.state.freshness.acceptable_delay()
    }

    pub fn administrator(&self) -> Option<Address> {
        self.state.administrator
    }

    /// Events of committed operations not yet taken
    pub fn events(&self) -> &[OracleEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- compute surface ----

    /// Plan a conversion against the current state.
    ///
    /// Validation failures surface here; proxy queries happen in
    /// [`Conversion::execute`].
    pub fn prepare_conversion(
        &self,
        amount: U256,
        in_decimals: u8,
        out_decimals: u8,
        token_in: Address,
        token_out: Address,
    ) -> OracleResult<Conversion> {
        if token_in == Address::ZERO || token_out == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }

        if token_in == token_out {
            let amount = rescale_amount(amount, in_decimals, out_decimals)?;
            return Ok(Conversion {
                amount,
                in_decimals,
                out_decimals,
                plan: Plan::Rescaled,
            });
        }

        let querier = FailoverQuerier::prepare(
            &self.state.pairs,
            &self.state.proxies,
            &self.state.failover,
            token_in,
            token_out,
        )?;

        Ok(Conversion {
            amount,
            in_decimals,
            out_decimals,
            plan: Plan::CrossRate {
                querier,
                freshness: self.state.freshness,
                directory: Arc::clone(&self.directory),
            },
        })
    }

    /// Amount of `token_out` equivalent to `amount` of `token_in` at time `now`
    pub async fn equivalent_output_amount(
        &self,
        amount: U256,
        in_decimals: u8,
        out_decimals: u8,
        token_in: Address,
        token_out: Address,
        now: Timestamp,
    ) -> OracleResult<U256> {
        self.prepare_conversion(amount, in_decimals, out_decimals, token_in, token_out)?
            .execute(now)
            .await
    }
}

impl fmt::Debug for PriceOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceOracle")
            .field("state", &self.state)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

enum Plan {
    /// Same asset; `Conversion::amount` already holds the result
    Rescaled,
    CrossRate {
        querier: FailoverQuerier,
        freshness: FreshnessPolicy,
        directory: Arc<dyn ProxyDirectory>,
    },
}

/// A planned conversion, detached from the oracle state
pub struct Conversion {
    amount: U256,
    in_decimals: u8,
    out_decimals: u8,
    plan: Plan,
}

impl Conversion {
    /// Whether executing will query price proxies
    pub fn needs_quotes(&self) -> bool {
        matches!(self.plan, Plan::CrossRate { .. })
    }

    pub async fn execute(self, now: Timestamp) -> OracleResult<U256> {
        match self.plan {
            Plan::Rescaled => Ok(self.amount),
            Plan::CrossRate {
                querier,
                freshness,
                directory,
            } => {
                let quotes = querier.quote(directory.as_ref(), &freshness, now).await?;
                cross_rate_amount(
                    self.amount,
                    self.in_decimals,
                    self.out_decimals,
                    &quotes.quote_a,
                    &quotes.quote_b,
                )
            }
        }
    }
}
