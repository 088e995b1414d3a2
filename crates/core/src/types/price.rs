//! Decimal prices as delivered by the backend.
//!
//! The backend owns all pricing. The front end only formats amounts and
//! compares them for local sorting, so a price is a plain decimal amount in
//! the shop currency.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the shop currency.
///
/// Deserializes from JSON numbers or numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("${rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::from_cents(1999).display(), "$19.99");
        assert_eq!(Price::new(Decimal::new(5, 0)).display(), "$5.00");
        assert_eq!(Price::new(Decimal::new(12_345, 3)).display(), "$12.35");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let a: Price = serde_json::from_str("19.99").unwrap();
        let b: Price = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Price::from_cents(1999));
    }
}
