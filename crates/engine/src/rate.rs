//! Fixed-point cross-rate arithmetic
//!
//! All scaling happens on `U256` with checked multiplication. Every power of
//! ten is folded into a single multiply-then-divide so the only rounding is
//! the final truncating division.

use alloy_primitives::U256;

use oracle_core::{OracleError, OracleResult, PriceQuote};

/// `10^exp`, failing if it does not fit in 256 bits
pub fn pow10(exp: u32) -> OracleResult<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(OracleError::Overflow)
}

/// Same-asset precision change: `amount * 10^(out - in)`, truncating when scaling down
pub fn rescale_amount(amount: U256, in_decimals: u8, out_decimals: u8) -> OracleResult<U256> {
    if out_decimals >= in_decimals {
        let factor = pow10(u32::from(out_decimals - in_decimals))?;
        amount.checked_mul(factor).ok_or(OracleError::Overflow)
    } else {
        // 10^78 already exceeds U256::MAX, so anything larger truncates to zero
        match pow10(u32::from(in_decimals - out_decimals)) {
            Ok(divisor) => Ok(amount / divisor),
            Err(_) => Ok(U256::ZERO),
        }
    }
}

/// Convert `amount` of the input asset into the output asset.
///
/// Computes `amount * (p_in / 10^d_in) / (p_out / 10^d_out) * 10^(out - in)` as
/// `amount * p_in * 10^(d_out + out)` over `p_out * 10^(d_in + in)`, with the
/// common powers of ten cancelled before multiplying. A zero output price is
/// rejected with `ZeroPrice`; quotes served by the failover querier are never zero.
pub fn cross_rate_amount(
    amount: U256,
    in_decimals: u8,
    out_decimals: u8,
    quote_in: &PriceQuote,
    quote_out: &PriceQuote,
) -> OracleResult<U256> {
    if quote_out.price.is_zero() {
        return Err(OracleError::ZeroPrice);
    }

    let up = u32::from(quote_out.decimals) + u32::from(out_decimals);
    let down = u32::from(quote_in.decimals) + u32::from(in_decimals);

    let mut numerator = amount
        .checked_mul(quote_in.price)
        .ok_or(OracleError::Overflow)?;
    let mut denominator = quote_out.price;

    if up > down {
        numerator = numerator
            .checked_mul(pow10(up - down)?)
            .ok_or(OracleError::Overflow)?;
    } else if down > up {
        denominator = denominator
            .checked_mul(pow10(down - up)?)
            .ok_or(OracleError::Overflow)?;
    }

    Ok(numerator / denominator)
}
