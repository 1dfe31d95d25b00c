//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Arithmetic keeps the currency of the left-hand side; the storefront only
/// ever mixes prices of one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from a number of cents.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_cents(cents: i64) -> Self {
        let magnitude = cents.unsigned_abs();
        let amount = Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            0,
            cents < 0,
            2,
        );
        Self::new(amount, CurrencyCode::USD)
    }

    /// A zero USD price.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(Decimal::ZERO, CurrencyCode::USD)
    }

    /// Whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// The amount in whole cents.
    #[must_use]
    pub fn cents(&self) -> i64 {
        (self.amount * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .unwrap_or(0)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Percentage of this price (e.g. `percent(dec!(15))` for 15%), rounded to cents.
    #[must_use]
    pub fn percent(self, percent: Decimal) -> Self {
        let amount = (self.amount * percent / Decimal::ONE_HUNDRED).round_dp(2);
        Self::new(amount, self.currency_code)
    }

    /// Subtract, clamping at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        let amount = (self.amount - other.amount).max(Decimal::ZERO);
        Self::new(amount, self.currency_code)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.amount - rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount.is_sign_negative() && !self.amount.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{sign}{}{:.2}",
            self.currency_code.symbol(),
            self.amount.abs()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::from_cents(500).to_string(), "$5.00");
        assert_eq!(Price::zero().to_string(), "$0.00");
        assert_eq!(Price::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn test_from_cents_matches_decimal() {
        const FEE: Price = Price::from_cents(599);
        assert_eq!(FEE.amount, Decimal::new(599, 2));
        assert_eq!(Price::from_cents(-250).amount, Decimal::new(-250, 2));
        assert_eq!(Price::from_cents(0), Price::zero());
        let large = 5_000_000_000_123;
        assert_eq!(Price::from_cents(large).amount, Decimal::new(large, 2));
        assert_eq!(Price::from_cents(large).cents(), large);
    }

    #[test]
    fn test_arithmetic() {
        let a = Price::from_cents(1250);
        let b = Price::from_cents(250);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 1000);
        assert_eq!(a.times(3).cents(), 3750);
        assert_eq!(b.saturating_sub(a), Price::zero());
    }

    #[test]
    fn test_percent_rounds_to_cents() {
        let price = Price::from_cents(3333);
        assert_eq!(price.percent(Decimal::from(15)).cents(), 500);
    }

    #[test]
    fn test_sum() {
        let total: Price = [100, 200, 300].into_iter().map(Price::from_cents).sum();
        assert_eq!(total.cents(), 600);
    }
}
