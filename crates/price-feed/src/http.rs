//! HTTP JSON price proxy client

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use oracle_core::{PriceQuote, ProxyEndpointConfig, ProxyError, ProxyResponse, ProxyResult};

use crate::proxy::PriceProxy;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceRequest<'a> {
    pair_a: &'a str,
    pair_b: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuote {
    /// Decimal or `0x`-prefixed hex
    price: String,
    decimals: u8,
    publish_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    quote_a: WireQuote,
    quote_b: WireQuote,
    #[serde(default)]
    error: String,
}

impl TryFrom<WireQuote> for PriceQuote {
    type Error = ProxyError;

    fn try_from(wire: WireQuote) -> Result<Self, Self::Error> {
        let price = wire
            .price
            .parse::<U256>()
            .map_err(|e| ProxyError::InvalidResponse(format!("price {:?}: {}", wire.price, e)))?;
        Ok(PriceQuote::new(price, wire.decimals, wire.publish_time))
    }
}

impl TryFrom<WireResponse> for ProxyResponse {
    type Error = ProxyError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        Ok(ProxyResponse::new(wire.quote_a.try_into()?, wire.quote_b.try_into()?).with_error(wire.error))
    }
}

/// Price proxy reached over HTTP.
///
/// POSTs `{"pairA", "pairB"}` and expects `{"quoteA", "quoteB", "error"}`.
#[derive(Debug, Clone)]
pub struct HttpPriceProxy {
    url: String,
    client: reqwest::Client,
}

impl HttpPriceProxy {
    pub fn new(url: impl Into<String>, timeout: Duration) -> ProxyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::RequestFailed(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn from_config(config: &ProxyEndpointConfig) -> ProxyResult<Self> {
        Self::new(config.url.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn request_error(e: reqwest::Error) -> ProxyError {
    if e.is_timeout() {
        ProxyError::Timeout
    } else {
        ProxyError::RequestFailed(e.to_string())
    }
}

#[async_trait::async_trait]
impl PriceProxy for HttpPriceProxy {
    async fn get_prices_by_pair_names(
        &self,
        pair_a: &str,
        pair_b: &str,
    ) -> ProxyResult<ProxyResponse> {
        debug!("Querying {} for {} and {}", self.url, pair_a, pair_b);

        let response = self
            .client
            .post(&self.url)
            .json(&PriceRequest { pair_a, pair_b })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::BadStatus(status.as_u16()));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| ProxyError::InvalidResponse(e.to_string()))?;

        body.try_into()
    }

    fn label(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_response_decimal_and_hex_prices() {
        let wire: WireResponse = serde_json::from_str(
            r#"{
                "quoteA": {"price": "1000", "decimals": 2, "publishTime": 1700000000},
                "quoteB": {"price": "0x7d0", "decimals": 3, "publishTime": 1700000001},
                "error": "stale feed"
            }"#,
        )
        .unwrap();

        let response = ProxyResponse::try_from(wire).unwrap();
        assert_eq!(response.quote_a.price, U256::from(1000u64));
        assert_eq!(response.quote_b.price, U256::from(2000u64));
        assert_eq!(response.quote_b.publish_time, 1_700_000_001);
        assert_eq!(response.error_message, "stale feed");
    }

    #[test]
    fn test_wire_response_missing_error_defaults_to_empty() {
        let wire: WireResponse = serde_json::from_str(
            r#"{
                "quoteA": {"price": "1", "decimals": 0, "publishTime": 1},
                "quoteB": {"price": "2", "decimals": 0, "publishTime": 1}
            }"#,
        )
        .unwrap();

        assert!(ProxyResponse::try_from(wire).unwrap().error_message.is_empty());
    }

    #[test]
    fn test_invalid_price_rejected() {
        let wire: WireResponse = serde_json::from_str(
            r#"{
                "quoteA": {"price": "-5", "decimals": 0, "publishTime": 1},
                "quoteB": {"price": "2", "decimals": 0, "publishTime": 1}
            }"#,
        )
        .unwrap();

        assert!(matches!(
            ProxyResponse::try_from(wire),
            Err(ProxyError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let proxy = HttpPriceProxy::new("http://127.0.0.1:1/prices", Duration::from_millis(500)).unwrap();

        assert!(proxy.get_prices_by_pair_names("A/USDT", "B/USDT").await.is_err());
        assert_eq!(proxy.label(), "http://127.0.0.1:1/prices");
    }
}
