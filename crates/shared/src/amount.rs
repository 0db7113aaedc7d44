//! Exact conversion between decimal native-unit strings and wei.
//!
//! Donation amounts arrive as free-form text. Conversion must be exact: an
//! input whose fractional part cannot be represented in 18 decimals is
//! rejected rather than silently rounded, and no floating point is involved
//! in either direction.

use alloy_primitives::U256;
use thiserror::Error;

/// The chain's native currency carries 18 fractional digits.
pub const NATIVE_DECIMALS: usize = 18;

/// Balances are rounded to 4 fractional digits for display.
pub const DISPLAY_DECIMALS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is not a decimal number")]
    Unparsable,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount has more than {NATIVE_DECIMALS} fractional digits")]
    PrecisionLoss,
    #[error("amount is too large")]
    TooLarge,
}

fn pow10(exp: usize) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}

/// Parses a positive decimal string into wei, exactly.
pub fn parse_native(input: &str) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Unparsable);
    }
    if let Some(rest) = trimmed.strip_prefix('-') {
        // Distinguish a negative number from plain garbage.
        if rest.chars().any(|c| c.is_ascii_digit()) {
            return Err(AmountError::NotPositive);
        }
        return Err(AmountError::Unparsable);
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(AmountError::Unparsable);
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::Unparsable);
    }

    let frac = if frac.len() > NATIVE_DECIMALS {
        // Trailing zeros beyond the 18th digit are harmless; anything else
        // would be silently lost.
        if frac[NATIVE_DECIMALS..].bytes().any(|b| b != b'0') {
            return Err(AmountError::PrecisionLoss);
        }
        &frac[..NATIVE_DECIMALS]
    } else {
        frac
    };

    let whole_wei = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10)
            .map_err(|_| AmountError::TooLarge)?
            .checked_mul(pow10(NATIVE_DECIMALS))
            .ok_or(AmountError::TooLarge)?
    };
    let frac_wei = if frac.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(frac, 10)
            .map_err(|_| AmountError::Unparsable)?
            .checked_mul(pow10(NATIVE_DECIMALS - frac.len()))
            .ok_or(AmountError::TooLarge)?
    };

    let wei = whole_wei.checked_add(frac_wei).ok_or(AmountError::TooLarge)?;
    if wei.is_zero() {
        return Err(AmountError::NotPositive);
    }
    Ok(wei)
}

/// Full-precision wei -> decimal string, trailing zeros trimmed.
pub fn format_native(wei: U256) -> String {
    let base = pow10(NATIVE_DECIMALS);
    let whole = wei / base;
    let frac = wei % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let mut digits = format!("{frac:0>NATIVE_DECIMALS$}");
    while digits.ends_with('0') {
        digits.pop();
    }
    format!("{whole}.{digits}")
}

/// Wei -> display string, rounded half-up to [`DISPLAY_DECIMALS`] digits.
/// Callers keep the raw `U256` for further computation.
pub fn format_display(wei: U256) -> String {
    let quantum = pow10(NATIVE_DECIMALS - DISPLAY_DECIMALS);
    let rounded = wei.saturating_add(quantum / U256::from(2u8)) / quantum;
    let base = pow10(DISPLAY_DECIMALS);
    let whole = rounded / base;
    let frac = rounded % base;
    format!("{whole}.{frac:0>DISPLAY_DECIMALS$}")
}
