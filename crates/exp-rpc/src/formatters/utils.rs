//! Value conversion utilities shared by the input and output formatters

use serde_json::{Number, Value};

use exp_primitives::Quantity;

use crate::error::FormatError;

/// Read an integer quantity out of a JSON number, hex string or decimal string
///
/// Fractional and exponent-form numbers are rejected rather than rounded.
pub fn quantity_of(value: &Value) -> Result<Quantity, FormatError> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(Quantity::from_u64(u))
            } else if let Some(i) = n.as_i64() {
                Ok(Quantity::from_i64(i))
            } else {
                Err(FormatError::InvalidQuantity(n.to_string()))
            }
        }
        Value::String(s) => Ok(s.parse::<Quantity>()?),
        other => Err(FormatError::unexpected("integer quantity", other)),
    }
}

/// Convert any supported value to its hex representation
pub fn to_hex(value: &Value) -> Result<Value, FormatError> {
    let hex = match value {
        Value::Bool(b) => Quantity::from_u64(u64::from(*b)).to_hex(),
        Value::Number(_) => quantity_of(value)?.to_hex(),
        Value::String(s) if s.starts_with("0x") || s.starts_with("-0x") => s.clone(),
        Value::String(s) if is_decimal(s) => Quantity::from_decimal(s)?.to_hex(),
        Value::String(s) => format!("0x{}", hex::encode(s.as_bytes())),
        Value::Array(_) | Value::Object(_) => {
            format!("0x{}", hex::encode(value.to_string().as_bytes()))
        }
        Value::Null => return Err(FormatError::unexpected("hex-convertible value", value)),
    };
    Ok(Value::String(hex))
}

/// Number or decimal string to hex quantity
pub fn from_decimal(value: &Value) -> Result<Value, FormatError> {
    Ok(Value::String(quantity_of(value)?.to_hex()))
}

/// Hex quantity to a JSON integer
///
/// Rejects values outside the 64-bit range instead of losing precision; use
/// [`to_big_number`] for quantities that may be wider.
pub fn to_decimal(value: &Value) -> Result<Value, FormatError> {
    let quantity = quantity_of(value)?;
    if let Some(u) = quantity.to_u64() {
        return Ok(Value::Number(Number::from(u)));
    }
    quantity
        .to_i64()
        .map(|i| Value::Number(Number::from(i)))
        .ok_or_else(|| FormatError::Overflow(quantity.to_decimal_string()))
}

/// Hex or decimal quantity to a full-precision decimal string
pub fn to_big_number(value: &Value) -> Result<Value, FormatError> {
    Ok(Value::String(quantity_of(value)?.to_decimal_string()))
}

/// JavaScript-style truthiness
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `value` is a string carrying the `0x` prefix
pub fn is_hex_prefixed(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.starts_with("0x"))
}

fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
