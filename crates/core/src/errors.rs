//! Error types

use alloy_primitives::Address;
use thiserror::Error;

use crate::{hex_address, hex_timestamp, Timestamp};

/// Coarse classification of oracle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authorization,
    Validation,
    Unavailability,
    Staleness,
    Arithmetic,
    Configuration,
}

/// Oracle error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("PriceOracle: caller {} is not the administrator", hex_address(.0))]
    Unauthorized(Address),

    #[error("PriceOracle: zero address")]
    ZeroAddress,

    #[error("PriceOracle: empty pair name")]
    EmptyPairName,

    #[error("PriceOracle: price pair already exists ({} is owned by {})", .name, hex_address(.owner))]
    PairAlreadyExists { name: String, owner: Address },

    #[error("PriceOracle: price pair is not registered for token {}", hex_address(.0))]
    PairNotRegistered(Address),

    #[error("PriceOracle: price proxy already exists ({})", hex_address(.0))]
    ProxyAlreadyExists(Address),

    #[error("PriceOracle: price proxy does not exists ({})", hex_address(.0))]
    ProxyNotFound(Address),

    #[error("PriceOracle: can not remove best price proxy")]
    CannotRemoveBestProxy(Address),

    #[error("PriceOracle: zero amount")]
    ZeroDelay,

    #[error("PriceOracle: best price proxy is empty")]
    BestProxyEmpty,

    #[error("PriceOracle: no price proxy returned a usable price ({attempts} tried)")]
    ProxiesExhausted { attempts: usize },

    #[error(
        "PriceOracle: price is expired, token {}, publishTime {}",
        hex_address(.token),
        hex_timestamp(*.publish_time)
    )]
    PriceExpired {
        token: Address,
        publish_time: Timestamp,
    },

    #[error("PriceOracle: arithmetic overflow")]
    Overflow,

    #[error("PriceOracle: zero output price")]
    ZeroPrice,

    #[error("PriceOracle: invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OracleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OracleError::Unauthorized(_) => ErrorKind::Authorization,
            OracleError::ZeroAddress
            | OracleError::EmptyPairName
            | OracleError::PairAlreadyExists { .. }
            | OracleError::PairNotRegistered(_)
            | OracleError::ProxyAlreadyExists(_)
            | OracleError::ProxyNotFound(_)
            | OracleError::CannotRemoveBestProxy(_)
            | OracleError::ZeroDelay => ErrorKind::Validation,
            OracleError::BestProxyEmpty | OracleError::ProxiesExhausted { .. } => {
                ErrorKind::Unavailability
            }
            OracleError::PriceExpired { .. } => ErrorKind::Staleness,
            OracleError::Overflow | OracleError::ZeroPrice => ErrorKind::Arithmetic,
            OracleError::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }
}

/// Price proxy errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("No client registered for price proxy {}", hex_address(.0))]
    Unresolved(Address),

    #[error("Price proxy request failed: {0}")]
    RequestFailed(String),

    #[error("Price proxy returned status {0}")]
    BadStatus(u16),

    #[error("Invalid price proxy response: {0}")]
    InvalidResponse(String),

    #[error("Timeout waiting for price proxy")]
    Timeout,
}

/// Result type alias
pub type OracleResult<T> = Result<T, OracleError>;
pub type ProxyResult<T> = Result<T, ProxyError>;
