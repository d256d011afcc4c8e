//! Failover quote querier
//!
//! Asks one proxy at a time for both prices, starting at the best proxy and
//! continuing through the remaining proxies in registry order. Each proxy is
//! tried at most once.

use alloy_primitives::Address;
use tracing::{debug, warn};

use oracle_core::{
    FailoverConfig, OracleError, OracleResult, ProxyResponse, QuotePair, Timestamp,
};
use oracle_price_feed::ProxyDirectory;
use oracle_registry::{FreshnessPolicy, PairRegistry, ProxyRegistry};

/// A resolved two-token quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverQuerier {
    token_a: Address,
    token_b: Address,
    pair_a: String,
    pair_b: String,
    candidates: Vec<Address>,
    fallback_on_error_message: bool,
}

impl FailoverQuerier {
    /// Resolve pair names and the candidate proxy order
    pub fn prepare(
        pairs: &PairRegistry,
        proxies: &ProxyRegistry,
        failover: &FailoverConfig,
        token_a: Address,
        token_b: Address,
    ) -> OracleResult<Self> {
        if token_a == Address::ZERO || token_b == Address::ZERO {
            return Err(OracleError::ZeroAddress);
        }

        let pair_a = pairs.get_pair(&token_a);
        if pair_a.is_empty() {
            return Err(OracleError::PairNotRegistered(token_a));
        }
        let pair_b = pairs.get_pair(&token_b);
        if pair_b.is_empty() {
            return Err(OracleError::PairNotRegistered(token_b));
        }

        if proxies.best().is_none() {
            return Err(OracleError::BestProxyEmpty);
        }

        Ok(Self {
            token_a,
            token_b,
            pair_a: pair_a.to_string(),
            pair_b: pair_b.to_string(),
            candidates: proxies.failover_order(),
            fallback_on_error_message: failover.fallback_on_error_message,
        })
    }

    pub fn pair_names(&self) -> (&str, &str) {
        (&self.pair_a, &self.pair_b)
    }

    /// Proxies in the order they will be asked
    pub fn candidates(&self) -> &[Address] {
        &self.candidates
    }

    /// Fetch both quotes and check each one's freshness, token A first
    pub async fn quote(
        &self,
        directory: &dyn ProxyDirectory,
        freshness: &FreshnessPolicy,
        now: Timestamp,
    ) -> OracleResult<QuotePair> {
        let (response, source) = self.fetch(directory).await?;

        freshness.ensure_fresh(self.token_a, &response.quote_a, now)?;
        freshness.ensure_fresh(self.token_b, &response.quote_b, now)?;

        Ok(QuotePair {
            quote_a: response.quote_a,
            quote_b: response.quote_b,
            source,
        })
    }

    /// First usable answer among the candidates
    async fn fetch(&self, directory: &dyn ProxyDirectory) -> OracleResult<(ProxyResponse, Address)> {
        for proxy in &self.candidates {
            let client = match directory.resolve(proxy) {
                Some(client) => client,
                None => {
                    warn!("Price proxy {} has no client, skipping", proxy);
                    continue;
                }
            };

            match client
                .get_prices_by_pair_names(&self.pair_a, &self.pair_b)
                .await
            {
                Ok(response) if !response.has_prices() => {
                    warn!(
                        "Price proxy {} returned a zero price for {} / {}, skipping",
                        proxy, self.pair_a, self.pair_b
                    );
                }
                Ok(response)
                    if self.fallback_on_error_message && !response.error_message.is_empty() =>
                {
                    warn!(
                        "Price proxy {} reported \"{}\", skipping",
                        proxy, response.error_message
                    );
                }
                Ok(response) => {
                    if !response.error_message.is_empty() {
                        warn!(
                            "Price proxy {} reported \"{}\" alongside non-zero prices",
                            proxy, response.error_message
                        );
                    }
                    debug!(
                        "Price proxy {} ({}) served {} / {}",
                        proxy,
                        client.label(),
                        self.pair_a,
                        self.pair_b
                    );
                    return Ok((response, *proxy));
                }
                Err(e) => {
                    warn!("Price proxy {} failed: {}", proxy, e);
                }
            }
        }

        Err(OracleError::ProxiesExhausted {
            attempts: self.candidates.len(),
        })
    }
}
