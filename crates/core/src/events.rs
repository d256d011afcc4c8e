//! Events emitted by committed administrative operations

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Oracle event journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum OracleEvent {
    /// `old_name` is empty for a first registration
    NewPricePair {
        token: Address,
        old_name: String,
        new_name: String,
    },
    AddPriceProxy {
        proxy: Address,
    },
    RemovePriceProxy {
        proxy: Address,
    },
    /// `previous` is the zero address when no best proxy was set
    NewBestPriceProxy {
        previous: Address,
        proxy: Address,
    },
    NewAcceptableDelay {
        old_delay: u64,
        new_delay: u64,
    },
    /// `new_admin` is the zero address after renouncement
    AdministrationTransferred {
        previous: Address,
        new_admin: Address,
    },
}

impl OracleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OracleEvent::NewPricePair { .. } => "NewPricePair",
            OracleEvent::AddPriceProxy { .. } => "AddPriceProxy",
            OracleEvent::RemovePriceProxy { .. } => "RemovePriceProxy",
            OracleEvent::NewBestPriceProxy { .. } => "NewBestPriceProxy",
            OracleEvent::NewAcceptableDelay { .. } => "NewAcceptableDelay",
            OracleEvent::AdministrationTransferred { .. } => "AdministrationTransferred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = OracleEvent::NewAcceptableDelay {
            old_delay: 120,
            new_delay: 100,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "NewAcceptableDelay");
        assert_eq!(json["old_delay"], 120);
        assert_eq!(event.name(), "NewAcceptableDelay");
    }
}
