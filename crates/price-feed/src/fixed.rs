//! In-memory price proxy returning a preset answer

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use oracle_core::{ProxyError, ProxyResponse, ProxyResult};

use crate::proxy::PriceProxy;

/// Proxy whose answer is set by the caller.
///
/// Until an answer is set every query fails, like an endpoint that is down.
#[derive(Debug)]
pub struct FixedPriceProxy {
    label: String,
    answer: Mutex<Option<ProxyResult<ProxyResponse>>>,
    calls: AtomicUsize,
}

impl FixedPriceProxy {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            answer: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(self, response: ProxyResponse) -> Self {
        self.set_response(response);
        self
    }

    pub fn set_response(&self, response: ProxyResponse) {
        *self.answer.lock() = Some(Ok(response));
    }

    pub fn set_failure(&self, error: ProxyError) {
        *self.answer.lock() = Some(Err(error));
    }

    pub fn clear(&self) {
        *self.answer.lock() = None;
    }

    /// Number of queries received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl PriceProxy for FixedPriceProxy {
    async fn get_prices_by_pair_names(
        &self,
        _pair_a: &str,
        _pair_b: &str,
    ) -> ProxyResult<ProxyResponse> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.answer
            .lock()
            .clone()
            .unwrap_or_else(|| Err(ProxyError::RequestFailed(format!("{} has no answer", self.label))))
    }

    fn label(&self) -> &str {
        &self.label
    }
}
