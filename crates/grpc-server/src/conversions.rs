//! Conversions between wire values and oracle types

use alloy_primitives::{Address, U256};
use tonic::Status;

use oracle_core::{hex_address, ErrorKind, OracleError, OracleEvent};

use crate::proto::OracleEventMessage;

/// Parse a 0x-prefixed hex address from request field `field`
pub fn parse_address(field: &str, value: &str) -> Result<Address, Status> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| Status::invalid_argument(format!("{field}: invalid address {value:?}: {e}")))
}

/// Parse a non-negative decimal amount
pub fn parse_amount(field: &str, value: &str) -> Result<U256, Status> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Status::invalid_argument(format!(
            "{field}: expected a decimal amount, got {value:?}"
        )));
    }

    U256::from_str_radix(value, 10)
        .map_err(|_| Status::invalid_argument(format!("{field}: amount exceeds 256 bits")))
}

pub fn parse_decimals(field: &str, value: u32) -> Result<u8, Status> {
    u8::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("{field}: {value} exceeds 255")))
}

pub fn parse_position(field: &str, value: u64) -> Result<usize, Status> {
    usize::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("{field}: {value} is out of range")))
}

/// Address as rendered on the wire, empty for `None`
pub fn address_to_wire(address: Option<Address>) -> String {
    address.map(|a| hex_address(&a)).unwrap_or_default()
}

/// Convert a journal entry to proto format
pub fn event_to_proto(event: &OracleEvent) -> OracleEventMessage {
    OracleEventMessage {
        name: event.name().to_string(),
        details: serde_json::to_string(event).unwrap_or_default(),
    }
}

/// Map an oracle error onto a gRPC status, keeping its message
pub fn oracle_status(err: OracleError) -> Status {
    let message = err.to_string();

    match err {
        OracleError::PairAlreadyExists { .. } | OracleError::ProxyAlreadyExists(_) => {
            return Status::already_exists(message)
        }
        OracleError::PairNotRegistered(_) | OracleError::ProxyNotFound(_) => {
            return Status::not_found(message)
        }
        _ => {}
    }

    match err.kind() {
        ErrorKind::Authorization => Status::permission_denied(message),
        ErrorKind::Validation => Status::invalid_argument(message),
        ErrorKind::Unavailability => Status::unavailable(message),
        ErrorKind::Staleness => Status::failed_precondition(message),
        ErrorKind::Arithmetic => Status::out_of_range(message),
        ErrorKind::Configuration => Status::internal(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_parse_address() {
        let parsed = parse_address("token", "0x00000000000000000000000000000000000000aA").unwrap();
        assert_eq!(parsed, Address::with_last_byte(0xaa));

        let err = parse_address("token", "not-an-address").unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert!(err.message().starts_with("token:"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", "10000").unwrap(), U256::from(10_000u64));
        assert_eq!(parse_amount("amount", "0").unwrap(), U256::ZERO);

        for bad in ["", "-1", "0x10", "1.5"] {
            assert_eq!(parse_amount("amount", bad).unwrap_err().code(), Code::InvalidArgument);
        }
        let too_big = "1".repeat(80);
        assert_eq!(parse_amount("amount", &too_big).unwrap_err().code(), Code::InvalidArgument);
    }

    #[test]
    fn test_parse_decimals() {
        assert_eq!(parse_decimals("in_decimals", 18).unwrap(), 18);
        assert!(parse_decimals("in_decimals", 256).is_err());
    }

    #[test]
    fn test_status_codes() {
        let a = Address::with_last_byte(1);

        assert_eq!(oracle_status(OracleError::Unauthorized(a)).code(), Code::PermissionDenied);
        assert_eq!(oracle_status(OracleError::ZeroAddress).code(), Code::InvalidArgument);
        assert_eq!(oracle_status(OracleError::ProxyAlreadyExists(a)).code(), Code::AlreadyExists);
        assert_eq!(oracle_status(OracleError::ProxyNotFound(a)).code(), Code::NotFound);
        assert_eq!(oracle_status(OracleError::PairNotRegistered(a)).code(), Code::NotFound);
        assert_eq!(oracle_status(OracleError::BestProxyEmpty).code(), Code::Unavailable);
        assert_eq!(
            oracle_status(OracleError::PriceExpired {
                token: a,
                publish_time: 1,
            })
            .code(),
            Code::FailedPrecondition
        );
        assert_eq!(oracle_status(OracleError::Overflow).code(), Code::OutOfRange);
        assert_eq!(oracle_status(OracleError::ZeroPrice).code(), Code::OutOfRange);
    }

    #[test]
    fn test_status_keeps_message() {
        let status = oracle_status(OracleError::BestProxyEmpty);
        assert_eq!(status.message(), OracleError::BestProxyEmpty.to_string());
    }

    #[test]
    fn test_event_to_proto() {
        let message = event_to_proto(&OracleEvent::NewAcceptableDelay {
            old_delay: 120,
            new_delay: 60,
        });

        assert_eq!(message.name, "NewAcceptableDelay");
        let details: serde_json::Value = serde_json::from_str(&message.details).unwrap();
        assert_eq!(details["event"], "NewAcceptableDelay");
        assert_eq!(details["new_delay"], 60);
    }

    #[test]
    fn test_address_to_wire() {
        assert_eq!(address_to_wire(None), "");
        assert_eq!(
            address_to_wire(Some(Address::with_last_byte(0x11))),
            format!("0x{}11", "0".repeat(38))
        );
    }
}
