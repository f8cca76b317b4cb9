//! Signed arbitrary-width quantities
//!
//! A [`Quantity`] is a sign plus a 256-bit magnitude. It parses the hex
//! (`0x..`, `-0x..`) and decimal (`123`, `-123`) spellings used by the node
//! and renders back to either without losing precision.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use thiserror::Error;

/// Quantity parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// No digits after the optional sign and prefix
    #[error("empty quantity")]
    Empty,
    /// A character outside the radix
    #[error("invalid digit in quantity: {0}")]
    InvalidDigit(String),
    /// Magnitude does not fit in 256 bits
    #[error("quantity exceeds 256 bits: {0}")]
    Overflow(String),
}

/// Signed integer quantity with a 256-bit magnitude
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Quantity {
    negative: bool,
    magnitude: U256,
}

impl Quantity {
    /// Zero
    pub const ZERO: Quantity = Quantity {
        negative: false,
        magnitude: U256([0; 4]),
    };

    /// Create a non-negative quantity
    pub fn from_u256(magnitude: U256) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    /// Create from a signed 64-bit integer
    pub fn from_i64(value: i64) -> Self {
        Self::signed(value < 0, U256::from(value.unsigned_abs()))
    }

    /// Create from an unsigned 64-bit integer
    pub fn from_u64(value: u64) -> Self {
        Self::from_u256(U256::from(value))
    }

    fn signed(negative: bool, magnitude: U256) -> Self {
        // -0 is normalized to 0
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    /// Parse a hex quantity (`0x1f`, `-0x1f`, or bare digits)
    pub fn from_hex(s: &str) -> Result<Self, QuantityError> {
        let (negative, rest) = split_sign(s);
        let digits = rest.strip_prefix("0x").unwrap_or(rest);
        Ok(Self::signed(negative, parse_hex_magnitude(digits)?))
    }

    /// Parse a decimal quantity (`31`, `-31`)
    pub fn from_decimal(s: &str) -> Result<Self, QuantityError> {
        let (negative, digits) = split_sign(s);
        if digits.is_empty() {
            return Err(QuantityError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(QuantityError::InvalidDigit(bad.to_string()));
        }
        let magnitude =
            U256::from_dec_str(digits).map_err(|_| QuantityError::Overflow(s.to_string()))?;
        Ok(Self::signed(negative, magnitude))
    }

    /// Whether the quantity is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Absolute value
    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Minimal hex rendering with `0x` prefix (`-0x` when negative)
    pub fn to_hex(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{}0x{:x}", sign, self.magnitude)
    }

    /// Full-precision decimal rendering
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{}{}", sign, self.magnitude)
    }

    /// Value as `u64`, if non-negative and in range
    pub fn to_u64(&self) -> Option<u64> {
        if self.negative || self.magnitude > U256::from(u64::MAX) {
            return None;
        }
        Some(self.magnitude.low_u64())
    }

    /// Value as `i64`, if in range
    pub fn to_i64(&self) -> Option<i64> {
        if self.magnitude > U256::from(i64::MAX as u64) {
            // i64::MIN has no positive counterpart
            if self.negative && self.magnitude == U256::from(1u64 << 63) {
                return Some(i64::MIN);
            }
            return None;
        }
        let value = self.magnitude.low_u64() as i64;
        Some(if self.negative { -value } else { value })
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    /// Hex when prefixed with `0x`/`-0x`, decimal otherwise
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, rest) = split_sign(s);
        if rest.starts_with("0x") {
            Self::from_hex(s)
        } else {
            Self::from_decimal(s)
        }
    }
}

impl From<U256> for Quantity {
    fn from(value: U256) -> Self {
        Self::from_u256(value)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({})", self.to_decimal_string())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

fn parse_hex_magnitude(digits: &str) -> Result<U256, QuantityError> {
    if digits.is_empty() {
        return Err(QuantityError::Empty);
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidDigit(bad.to_string()));
    }
    let significant = digits.trim_start_matches('0');
    if significant.len() > 64 {
        return Err(QuantityError::Overflow(format!("0x{}", digits)));
    }
    // Pad to 64 hex chars (32 bytes)
    let padded = format!("{:0>64}", significant);
    let bytes = hex::decode(&padded).map_err(|e| QuantityError::InvalidDigit(e.to_string()))?;
    Ok(U256::from_big_endian(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hex_to_decimal_beyond_53_bits() {
        let q = Quantity::from_hex("0x2386f26fc10000").unwrap();
        assert_eq!(q.to_decimal_string(), "10000000000000000");
    }

    #[test]
    fn test_full_width_value() {
        let max = format!("0x{}", "f".repeat(64));
        let q = Quantity::from_hex(&max).unwrap();
        assert_eq!(q.magnitude(), U256::MAX);
        assert_eq!(
            q.to_decimal_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(q.to_hex(), max);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let too_wide = format!("0x1{}", "0".repeat(64));
        assert!(matches!(
            Quantity::from_hex(&too_wide),
            Err(QuantityError::Overflow(_))
        ));
        let too_big = format!("1{}", "0".repeat(80));
        assert!(matches!(
            Quantity::from_decimal(&too_big),
            Err(QuantityError::Overflow(_))
        ));
    }

    #[test]
    fn test_leading_zeros_do_not_count_towards_width() {
        let padded = format!("0x{}1", "0".repeat(70));
        assert_eq!(Quantity::from_hex(&padded).unwrap().to_u64(), Some(1));
    }

    #[test]
    fn test_negative_quantities() {
        let q: Quantity = "-0x1f".parse().unwrap();
        assert!(q.is_negative());
        assert_eq!(q.to_decimal_string(), "-31");
        assert_eq!(q.to_i64(), Some(-31));
        assert_eq!(q.to_u64(), None);

        let q: Quantity = "-31".parse().unwrap();
        assert_eq!(q.to_hex(), "-0x1f");
        assert_eq!(Quantity::from_i64(i64::MIN).to_i64(), Some(i64::MIN));
    }

    #[test]
    fn test_negative_zero_normalizes() {
        let q: Quantity = "-0".parse().unwrap();
        assert!(!q.is_negative());
        assert_eq!(q.to_hex(), "0x0");
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(Quantity::from_hex("0x"), Err(QuantityError::Empty));
        assert_eq!(Quantity::from_decimal(""), Err(QuantityError::Empty));
        assert!(matches!(
            Quantity::from_hex("0xzz"),
            Err(QuantityError::InvalidDigit(_))
        ));
        assert!(matches!(
            Quantity::from_decimal("12a"),
            Err(QuantityError::InvalidDigit(_))
        ));
    }

    #[test]
    fn test_zero_renders_minimal_hex() {
        assert_eq!(Quantity::ZERO.to_hex(), "0x0");
        assert_eq!(Quantity::from_u64(255).to_hex(), "0xff");
    }

    proptest! {
        #[test]
        fn hex_and_decimal_agree_with_u128(value: u128) {
            let from_hex = Quantity::from_hex(&format!("0x{:x}", value)).unwrap();
            prop_assert_eq!(from_hex.to_decimal_string(), value.to_string());

            let from_dec = Quantity::from_decimal(&value.to_string()).unwrap();
            prop_assert_eq!(from_dec.to_hex(), format!("0x{:x}", value));
        }
    }
}
