//! Unit price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit price of a cart line.
///
/// The cart never does arithmetic on prices; the value is carried through
/// so consumers can render it. Stored as a [`Decimal`] to avoid float
/// drift, serialized as a JSON number so persisted snapshots stay readable
/// by other clients of the same storage key.
///
/// The number is written with the exact digits of the decimal (no `f64`
/// hop), so every representable amount reloads unchanged, up to
/// [`Decimal::MAX`] and down to 28 fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reparse(price: Price) -> Price {
        let json = serde_json::to_string(&price).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_units(100)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(100.0));
        assert_eq!(serde_json::to_string(&Price::from_units(100)).unwrap(), "100");
    }

    #[test]
    fn test_writes_exact_digits() {
        let price: Price = "19.990".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "19.990");
    }

    #[test]
    fn test_fractional_price_keeps_every_digit() {
        let price: Price = "0.12345678901234567891".parse().unwrap();
        let back = reparse(price);
        assert_eq!(back, price);
        assert_eq!(back.amount().to_string(), "0.12345678901234567891");
    }

    #[test]
    fn test_extreme_prices_reload() {
        let max: Price = "79228162514264337593543950335".parse().unwrap();
        assert_eq!(max.amount(), Decimal::MAX);
        assert_eq!(reparse(max), max);

        let min: Price = "-79228162514264337593543950335".parse().unwrap();
        assert_eq!(min.amount(), Decimal::MIN);
        assert_eq!(reparse(min), min);

        let tiny: Price = "0.0000000000000000000000000001".parse().unwrap();
        assert_eq!(reparse(tiny), tiny);
    }

    #[test]
    fn test_negative_price_reloads() {
        let refund: Price = "-12.35".parse().unwrap();
        let back = reparse(refund);
        assert_eq!(back, refund);
        assert_eq!(back.to_string(), "-12.35");
    }

    #[test]
    fn test_reads_price_through_value() {
        let price: Price = serde_json::from_value(serde_json::json!(0.1)).unwrap();
        assert_eq!(price.amount(), Decimal::new(1, 1));
    }

    #[test]
    fn test_deserializes_integer_and_fraction() {
        let whole: Price = serde_json::from_str("100").unwrap();
        assert_eq!(whole, Price::from_units(100));

        let cents: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(cents.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_parse_and_display() {
        let price: Price = " 4.5 ".parse().unwrap();
        assert_eq!(price.to_string(), "4.50");
        assert!("four".parse::<Price>().is_err());
    }
}
