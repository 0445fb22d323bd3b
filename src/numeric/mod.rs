//! Scaled-integer decimal arithmetic for order amounts and prices.
//!
//! Every quantity that crosses a percentage ↔ base-unit or share ↔ currency
//! boundary goes through this module. Decimal text is parsed into an integer
//! numerator plus a tracked decimal-place count, combined as `U256` integers,
//! and only rendered back to decimal text at the boundary. No float ever
//! touches an amount or a price.

use ethers::types::U256;
use thiserror::Error;

/// Base-unit scale shared by the collateral token and outcome shares.
pub const BASE_UNIT_DECIMALS: u32 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumericError {
    #[error("not a decimal number: {0:?}")]
    Malformed(String),
    #[error("negative value not allowed: {0:?}")]
    Negative(String),
    #[error("{value:?} has {got} significant fractional digits, at most {max} are representable")]
    TooPrecise { value: String, got: u32, max: u32 },
    #[error("magnitude of {0:?} overflows 256-bit arithmetic")]
    Overflow(String),
}

/// Splits decimal text into an integer numerator and its decimal-place count.
///
/// `"1.5"` → `(15, 1)`, `"99.11"` → `(9911, 2)`, `"7"` → `(7, 0)`. A missing
/// or empty fractional part contributes zero decimal places.
pub fn scale_to_integer(text: &str) -> Result<(U256, u32), NumericError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(NumericError::Negative(text.to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    let digits: String = [int_part, frac_part].concat();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::Malformed(text.to_string()));
    }

    let value = U256::from_dec_str(&digits)
        .map_err(|_| NumericError::Overflow(text.to_string()))?;

    Ok((value, frac_part.len() as u32))
}

/// `shares * price / 100`, rendered at the canonical 18-decimal scale with
/// trailing zeros trimmed.
///
/// The multiplication keeps the union of both operands' decimal places, so
/// `result / shares == price / 100` holds exactly in rational terms whenever
/// the combined precision fits the 18-place output (it always does for the
/// 2-decimal prices and 4-decimal sizes the exchange accepts).
pub fn amount_from_shares_and_price(shares: &str, price: &str) -> Result<String, NumericError> {
    let (s, s_places) = scale_to_integer(shares)?;
    let (p, p_places) = scale_to_integer(price)?;

    let numerator = s
        .checked_mul(p)
        .ok_or_else(|| NumericError::Overflow(format!("{shares} * {price}")))?;
    let scale = s_places + p_places;

    // value = numerator / 10^scale / 100, truncated at 18 places
    let scaled = numerator
        .checked_mul(pow10(BASE_UNIT_DECIMALS)?)
        .ok_or_else(|| NumericError::Overflow(format!("{shares} * {price}")))?;
    let denominator = pow10(scale)?
        .checked_mul(U256::from(100u8))
        .ok_or_else(|| NumericError::Overflow(format!("{shares} * {price}")))?;

    render_decimal(scaled / denominator, BASE_UNIT_DECIMALS)
}

/// Converts a 0–100 percentage into the market's fractional price text with
/// exactly three decimal places, truncating toward zero.
///
/// `"99.11"` → `"0.991"`, `"99.1"` → `"0.991"`, `"1"` → `"0.010"`. The
/// truncation (not nearest-even) is what the matching engine expects; do not
/// change it.
pub fn price_to_market_fraction(percentage: &str) -> Result<String, NumericError> {
    let (p, places) = scale_to_integer(percentage)?;

    // percentage / 100 at 3 places: p * 10^3 / (10^places * 100), truncated
    let numerator = p
        .checked_mul(U256::from(1_000u16))
        .ok_or_else(|| NumericError::Overflow(percentage.to_string()))?;
    let denominator = pow10(places)?
        .checked_mul(U256::from(100u8))
        .ok_or_else(|| NumericError::Overflow(percentage.to_string()))?;
    let milli = numerator / denominator;

    let whole = milli / U256::from(1_000u16);
    let frac = (milli % U256::from(1_000u16)).as_u64();
    Ok(format!("{whole}.{frac:03}"))
}

/// Lossless conversion from decimal text to a base-unit integer string.
///
/// Trailing fractional zeros are insignificant and dropped; any remaining
/// digit beyond `decimals` places is an error, never a silent truncation.
pub fn to_base_units(text: &str, decimals: u32) -> Result<String, NumericError> {
    let (mut value, mut places) = scale_to_integer(text)?;

    while places > decimals {
        if (value % U256::from(10u8)).is_zero() {
            value /= U256::from(10u8);
            places -= 1;
        } else {
            return Err(NumericError::TooPrecise {
                value: text.to_string(),
                got: places,
                max: decimals,
            });
        }
    }

    let units = value
        .checked_mul(pow10(decimals - places)?)
        .ok_or_else(|| NumericError::Overflow(text.to_string()))?;
    Ok(units.to_string())
}

/// Inverse of [`to_base_units`]: base-unit integer text back to decimal text
/// with trailing zeros trimmed.
pub fn from_base_units(text: &str, decimals: u32) -> Result<String, NumericError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(NumericError::Negative(text.to_string()));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::Malformed(text.to_string()));
    }
    let units = U256::from_dec_str(trimmed)
        .map_err(|_| NumericError::Overflow(text.to_string()))?;
    render_decimal(units, decimals)
}

/// Renders an integer carrying `decimals` implied decimal places as decimal
/// text, trimming trailing fractional zeros.
pub(crate) fn render_decimal(units: U256, decimals: u32) -> Result<String, NumericError> {
    let divisor = pow10(decimals)?;
    let whole = units / divisor;
    let frac = units % divisor;

    if frac.is_zero() {
        return Ok(whole.to_string());
    }

    let mut frac_text = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    while frac_text.ends_with('0') {
        frac_text.pop();
    }
    Ok(format!("{whole}.{frac_text}"))
}

pub(crate) fn pow10(exp: u32) -> Result<U256, NumericError> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or_else(|| NumericError::Overflow(format!("10^{exp}")))
}
