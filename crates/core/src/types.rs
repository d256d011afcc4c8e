//! Core type definitions

use alloy_primitives::{hex, Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// A single price reported by a price proxy for one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price: U256,
    pub decimals: u8,
    pub publish_time: Timestamp,
}

impl PriceQuote {
    pub fn new(price: U256, decimals: u8, publish_time: Timestamp) -> Self {
        Self {
            price,
            decimals,
            publish_time,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.price.is_zero()
    }

    /// Seconds elapsed since publication; a publish time ahead of `now` counts as zero
    pub fn age(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.publish_time)
    }
}

/// Raw answer of a price proxy to a two-pair query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub quote_a: PriceQuote,
    pub quote_b: PriceQuote,
    #[serde(default, rename = "error")]
    pub error_message: String,
}

impl ProxyResponse {
    pub fn new(quote_a: PriceQuote, quote_b: PriceQuote) -> Self {
        Self {
            quote_a,
            quote_b,
            error_message: String::new(),
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Both prices are non-zero
    pub fn has_prices(&self) -> bool {
        !self.quote_a.is_zero() && !self.quote_b.is_zero()
    }
}

/// Two validated quotes together with the proxy that served them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePair {
    pub quote_a: PriceQuote,
    pub quote_b: PriceQuote,
    pub source: Address,
}

/// Token to price-pair-name registration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricePair {
    pub token: Address,
    pub name: String,
}

impl fmt::Display for PricePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", hex_address(&self.token), self.name)
    }
}

/// Lowercase `0x`-prefixed rendering of an address
pub fn hex_address(address: &Address) -> String {
    hex::encode_prefixed(address)
}

/// `0x`-prefixed big-endian rendering with leading zero bytes stripped.
///
/// Always at least one byte wide, so zero renders as `0x00`.
pub fn hex_timestamp(value: Timestamp) -> String {
    let bytes = value.to_be_bytes();
    let first = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len() - 1);
    hex::encode_prefixed(&bytes[first..])
}

/// Current unix time in seconds
pub fn now_secs() -> Timestamp {
    chrono::Utc::now().timestamp().max(0) as Timestamp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_timestamp_strips_leading_zero_bytes() {
        assert_eq!(hex_timestamp(0x6553_f100), "0x6553f100");
        assert_eq!(hex_timestamp(0x0100), "0x0100");
        assert_eq!(hex_timestamp(0x0f), "0x0f");
        assert_eq!(hex_timestamp(0), "0x00");
    }

    #[test]
    fn test_hex_address_is_lowercase() {
        let addr: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
        assert_eq!(hex_address(&addr), "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    }

    #[test]
    fn test_quote_age_saturates_for_future_publish_time() {
        let quote = PriceQuote::new(U256::from(1u64), 8, 1_000);
        assert_eq!(quote.age(1_120), 120);
        assert_eq!(quote.age(900), 0);
    }

    #[test]
    fn test_proxy_response_requires_both_prices() {
        let good = PriceQuote::new(U256::from(1000u64), 2, 0);
        let zero = PriceQuote::new(U256::ZERO, 2, 0);

        assert!(ProxyResponse::new(good, good).has_prices());
        assert!(!ProxyResponse::new(zero, good).has_prices());
        assert!(!ProxyResponse::new(good, zero).has_prices());
    }

    #[test]
    fn test_proxy_response_json_shape() {
        let json = r#"{
            "quoteA": {"price": "0x3e8", "decimals": 2, "publishTime": 10},
            "quoteB": {"price": "0x7d0", "decimals": 3, "publishTime": 11},
            "error": ""
        }"#;
        let response: ProxyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.quote_a.price, U256::from(1000u64));
        assert_eq!(response.quote_b.decimals, 3);
        assert_eq!(response.quote_b.publish_time, 11);
        assert!(response.error_message.is_empty());
    }
}
