//! Exact decimal handling for prices and sizes.
//!
//! Venue payloads carry numbers either as JSON numbers, as strings, or as
//! integers scaled by a power of ten. Everything is brought into
//! [`Decimal`] at the adapter boundary and never passes through `f64`
//! arithmetic.

use crate::core::errors::ExchangeError;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parse a JSON scalar into an exact decimal
///
/// JSON numbers are read through their shortest textual form, so `5.1`
/// becomes exactly `5.1` rather than the nearest binary fraction.
pub fn parse_decimal(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| format!("invalid number {}: {}", n, e)),
        Value::String(s) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|e| format!("invalid decimal {:?}: {}", s, e)),
        other => Err(format!("expected number, got {}", other)),
    }
}

/// `deserialize_with` adapter accepting numbers or numeric strings
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_decimal(&value).map_err(serde::de::Error::custom)
}

/// Encode `value` as an integer count of `10^-exponent` units
///
/// Fails instead of rounding when `value` carries more precision than the
/// venue accepts.
pub fn to_scaled(value: Decimal, exponent: u32) -> Result<i64, ExchangeError> {
    let factor = Decimal::from(10_i64.pow(exponent));
    let scaled = value
        .checked_mul(factor)
        .ok_or_else(|| overflow(value, exponent))?;

    if scaled.fract() != Decimal::ZERO {
        return Err(ExchangeError::InvalidParameters(format!(
            "{} has more than {} decimal places",
            value, exponent
        )));
    }

    scaled
        .trunc()
        .to_i64()
        .ok_or_else(|| overflow(value, exponent))
}

fn overflow(value: Decimal, exponent: u32) -> ExchangeError {
    ExchangeError::InvalidParameters(format!("{} overflows at 1e{}", value, exponent))
}

/// Inverse of [`to_scaled`]
pub fn from_scaled(units: i64, exponent: u32) -> Decimal {
    Decimal::new(units, exponent).normalize()
}

/// Parse a scaled integer delivered as a JSON string or number
pub fn parse_scaled(value: &Value, exponent: u32) -> Result<Decimal, String> {
    let units = match value {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid scaled integer {:?}: {}", s, e))?,
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("invalid scaled integer {}", n))?,
        other => return Err(format!("expected scaled integer, got {}", other)),
    };
    Ok(from_scaled(units, exponent))
}
