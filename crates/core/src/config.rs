//! Configuration types

use alloy_primitives::Address;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::{OracleError, OracleResult};

/// Environment variable prefix for overrides, e.g. `ORACLE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "ORACLE";

pub const DEFAULT_ACCEPTABLE_DELAY_SECS: u64 = 120;

/// Failover behaviour of the quote querier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailoverConfig {
    /// Skip a proxy that reports a non-empty error string even when its prices are non-zero
    #[serde(default = "default_true")]
    pub fallback_on_error_message: bool,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            fallback_on_error_message: true,
        }
    }
}

/// Token to pair-name registration applied at start-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    pub token: Address,
    pub name: String,
}

/// Price proxy endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyEndpointConfig {
    pub address: Address,
    pub url: String,
    #[serde(default = "default_proxy_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProxyEndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Oracle state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_acceptable_delay")]
    pub acceptable_delay_secs: u64,
    pub administrator: Address,
    #[serde(default)]
    pub failover: FailoverConfig,
    #[serde(default)]
    pub pairs: Vec<PairConfig>,
    #[serde(default)]
    pub proxies: Vec<ProxyEndpointConfig>,
    #[serde(default)]
    pub best_proxy: Option<Address>,
}

impl OracleConfig {
    pub fn new(administrator: Address, acceptable_delay_secs: u64) -> Self {
        Self {
            acceptable_delay_secs,
            administrator,
            failover: FailoverConfig::default(),
            pairs: vec![],
            proxies: vec![],
            best_proxy: None,
        }
    }

    pub fn validate(&self) -> OracleResult<()> {
        if self.acceptable_delay_secs == 0 {
            return Err(OracleError::ZeroDelay);
        }
        if self.administrator == Address::ZERO {
            return Err(OracleError::InvalidConfig(
                "administrator must not be the zero address".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for proxy in &self.proxies {
            if !seen.insert(proxy.address) {
                return Err(OracleError::InvalidConfig(format!(
                    "price proxy {} listed twice",
                    proxy.address
                )));
            }
        }

        if let Some(best) = self.best_proxy {
            if !seen.contains(&best) {
                return Err(OracleError::InvalidConfig(format!(
                    "best proxy {} is not among the configured proxies",
                    best
                )));
            }
        }

        Ok(())
    }
}

/// gRPC server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub keep_alive_interval_secs: u64,
    pub keep_alive_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50051,
            keep_alive_interval_secs: 60,
            keep_alive_timeout_secs: 20,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from a TOML file, then apply `ORACLE__*` environment overrides
    pub fn load(path: &str) -> OracleResult<Self> {
        Self::build(File::new(path, FileFormat::Toml))
    }

    /// Load from TOML text, then apply `ORACLE__*` environment overrides
    pub fn from_toml_str(text: &str) -> OracleResult<Self> {
        Self::build(File::from_str(text, FileFormat::Toml))
    }

    fn build<S>(file: S) -> OracleResult<Self>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let config: AppConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| OracleError::InvalidConfig(e.to_string()))?;

        config.oracle.validate()?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

fn default_proxy_timeout_ms() -> u64 {
    2_000
}

fn default_acceptable_delay() -> u64 {
    DEFAULT_ACCEPTABLE_DELAY_SECS
}
