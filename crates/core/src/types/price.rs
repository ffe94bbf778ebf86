//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are Brazilian reais. The spreadsheet source is loosely typed,
//! so [`Price::parse`] accepts plain decimals (`"25.90"`), Brazilian notation
//! (`"R$ 1.025,90"`) and bare integers.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty after trimming the currency symbol.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative amount in reais.
///
/// Serialized as a JSON number, the shape stored shopping lists and backup
/// partners expect. Deserialization accepts numbers and decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a price from spreadsheet text.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not numeric, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim().trim_start_matches("R$").trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        // "1.025,90" -> "1025.90"
        let canonical = if trimmed.contains(',') {
            trimmed.replace('.', "").replace(',', ".")
        } else {
            trimmed.to_owned()
        };

        let amount = Decimal::from_str(&canonical)
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Format for display (e.g., "R$ 25,90").
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {:.2}", self.0.round_dp(2)).replace('.', ",")
    }

    /// Multiply by an item quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(Price::parse("25.90").unwrap(), Price::from_cents(2590));
    }

    #[test]
    fn test_parse_brazilian_notation() {
        assert_eq!(Price::parse("R$ 1.025,90").unwrap(), Price::from_cents(102_590));
        assert_eq!(Price::parse("7,5").unwrap(), Price::from_cents(750));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Price::parse("  R$ "), Err(PriceError::Empty));
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse("-3.00"), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_display_uses_comma() {
        assert_eq!(Price::from_cents(2500).display(), "R$ 25,00");
        assert_eq!(Price::parse("3.456").unwrap().display(), "R$ 3,46");
    }

    #[test]
    fn test_serializes_as_number() {
        let value = serde_json::to_value(Price::from_cents(2550)).unwrap();
        assert!(value.is_number());
        assert_eq!(value, 25.5);

        let back: Price = serde_json::from_value(value).unwrap();
        assert_eq!(back, Price::from_cents(2550));
    }

    #[test]
    fn test_deserialize_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("28.5").unwrap();
        let from_string: Price = serde_json::from_str("\"28.50\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_sum_and_times() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
        assert_eq!(Price::from_cents(125).times(4), Price::from_cents(500));
    }
}
