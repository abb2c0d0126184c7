//! Decimal money helpers.
//!
//! All monetary computation runs on `rust_decimal::Decimal`; conversion to a
//! fixed two-decimal string or to `f64` happens exactly once, at the
//! serialization boundary, never mid-computation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Render an amount with exactly two decimal places, midpoint rounded away
/// from zero.
pub fn fixed2(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Divide two amounts, failing instead of panicking on a zero divisor.
pub fn checked_div(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| Error::Arithmetic(format!("cannot divide {} by {}", numerator, denominator)))
}

/// Lossy conversion for display and aggregation at the boundary (event
/// metadata, charts). Not for further monetary computation.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Serde adapter rendering a `Decimal` field as a fixed-2 string.
pub mod serde_fixed2 {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::fixed2(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Decimal, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Decimal::from_str(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional fixed-2 string fields.
pub mod serde_opt_fixed2 {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(amount) => serializer.serialize_some(&super::fixed2(*amount)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Decimal>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| Decimal::from_str(&s).map_err(de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_fixed2_pads_and_rounds() {
        assert_eq!(fixed2(dec!(150.5)), "150.50");
        assert_eq!(fixed2(dec!(1000)), "1000.00");
        assert_eq!(fixed2(dec!(2.345)), "2.35");
        assert_eq!(fixed2(dec!(-2.345)), "-2.35");
        assert_eq!(fixed2(dec!(0.004)), "0.00");
    }

    #[test]
    fn test_checked_div() {
        assert_eq!(checked_div(dec!(10), dec!(4)).unwrap(), dec!(2.5));

        let err = checked_div(dec!(10), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, Error::Arithmetic(_)));
    }

    #[test]
    fn test_to_f64_boundary_conversion() {
        assert_relative_eq!(to_f64(dec!(0.04)), 0.04, epsilon = 1e-12);
        assert_relative_eq!(to_f64(dec!(2500000)), 2_500_000.0, epsilon = 1e-6);
    }
}
