//! Delivery estimation by ZIP code region.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::Price;

/// Subtotal from which standard shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::from_cents(5000);

const STANDARD_COST: Price = Price::from_cents(599);
const EXPRESS_COST: Price = Price::from_cents(1499);

/// Errors from delivery estimation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShippingError {
    #[error("ZIP code must be exactly 5 digits")]
    InvalidZip,
}

/// Shipping speed chosen at checkout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    /// All methods, in display order.
    pub const ALL: [Self; 2] = [Self::Standard, Self::Express];

    /// Machine-readable value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Express => "Express",
        }
    }

    /// Shipping cost for an order with this subtotal.
    #[must_use]
    pub fn cost(self, subtotal: Price) -> Price {
        match self {
            Self::Standard if subtotal >= FREE_SHIPPING_THRESHOLD => Price::zero(),
            Self::Standard => STANDARD_COST,
            Self::Express => EXPRESS_COST,
        }
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

/// A shipping region with its standard transit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShippingZone {
    pub region: &'static str,
    /// Minimum standard business days.
    pub min_days: u32,
    /// Maximum standard business days.
    pub max_days: u32,
}

impl ShippingZone {
    const fn new(region: &'static str, min_days: u32, max_days: u32) -> Self {
        Self {
            region,
            min_days,
            max_days,
        }
    }

    /// Look up the zone for a ZIP code by its leading digit.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::InvalidZip` unless the input (trimmed) is
    /// exactly five ASCII digits.
    pub fn for_zip(zip: &str) -> Result<Self, ShippingError> {
        let zip = zip.trim();
        if zip.len() != 5 || !zip.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ShippingError::InvalidZip);
        }

        let zone = match zip.as_bytes().first() {
            Some(b'0' | b'1') => Self::new("Northeast", 2, 4),
            Some(b'2') => Self::new("Mid-Atlantic", 2, 4),
            Some(b'3') => Self::new("Southeast", 3, 5),
            Some(b'4') => Self::new("Great Lakes", 3, 5),
            Some(b'5') => Self::new("Upper Midwest", 4, 6),
            Some(b'6') => Self::new("Central", 4, 6),
            Some(b'7') => Self::new("South Central", 4, 6),
            Some(b'8') => Self::new("Mountain", 5, 7),
            Some(b'9') => Self::new("Pacific", 5, 8),
            _ => return Err(ShippingError::InvalidZip),
        };
        Ok(zone)
    }

    /// Business-day range for a shipping method.
    #[must_use]
    pub const fn transit_days(&self, method: ShippingMethod) -> (u32, u32) {
        match method {
            ShippingMethod::Standard => (self.min_days, self.max_days),
            ShippingMethod::Express => (1, 2),
        }
    }
}

/// Estimated delivery window for one shipping method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryEstimate {
    pub zone: ShippingZone,
    pub method: ShippingMethod,
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub cost: Price,
}

impl DeliveryEstimate {
    /// Estimate delivery to `zip` for an order placed on `today`.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::InvalidZip` for malformed ZIP codes.
    pub fn for_zip(
        zip: &str,
        method: ShippingMethod,
        subtotal: Price,
        today: NaiveDate,
    ) -> Result<Self, ShippingError> {
        let zone = ShippingZone::for_zip(zip)?;
        let (min, max) = zone.transit_days(method);
        Ok(Self {
            zone,
            method,
            earliest: add_business_days(today, min),
            latest: add_business_days(today, max),
            cost: method.cost(subtotal),
        })
    }

    /// Human-readable window, e.g. "Mon, Jun 15 - Wed, Jun 17".
    #[must_use]
    pub fn window(&self) -> String {
        format!(
            "{} - {}",
            self.earliest.format("%a, %b %-d"),
            self.latest.format("%a, %b %-d")
        )
    }
}

/// The date `days` business days after `start`, skipping Saturdays and Sundays.
#[must_use]
pub fn add_business_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut date = start;
    let mut remaining = days;
    while remaining > 0 {
        let Some(next) = date.checked_add_days(Days::new(1)) else {
            break;
        };
        date = next;
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    date
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zone_lookup() {
        assert_eq!(ShippingZone::for_zip("02134").unwrap().region, "Northeast");
        assert_eq!(ShippingZone::for_zip("10001").unwrap().region, "Northeast");
        assert_eq!(ShippingZone::for_zip("60601").unwrap().region, "Central");
        let pacific = ShippingZone::for_zip(" 94103 ").unwrap();
        assert_eq!(pacific.region, "Pacific");
        assert_eq!((pacific.min_days, pacific.max_days), (5, 8));
    }

    #[test]
    fn test_invalid_zip() {
        for zip in ["", "1234", "123456", "12a45", "１２３４５"] {
            assert_eq!(ShippingZone::for_zip(zip), Err(ShippingError::InvalidZip), "{zip}");
        }
    }

    #[test]
    fn test_business_days_skip_weekends() {
        // 2026-06-12 is a Friday.
        let friday = date(2026, 6, 12);
        assert_eq!(add_business_days(friday, 1), date(2026, 6, 15));
        assert_eq!(add_business_days(friday, 5), date(2026, 6, 19));
        // Starting on Saturday, the first business day is Monday.
        assert_eq!(add_business_days(date(2026, 6, 13), 1), date(2026, 6, 15));
        assert_eq!(add_business_days(friday, 0), friday);
    }

    #[test]
    fn test_estimate_for_express() {
        let monday = date(2026, 6, 15);
        let estimate =
            DeliveryEstimate::for_zip("98101", ShippingMethod::Express, Price::zero(), monday)
                .unwrap();
        assert_eq!(estimate.earliest, date(2026, 6, 16));
        assert_eq!(estimate.latest, date(2026, 6, 17));
        assert_eq!(estimate.cost.cents(), 1499);
        assert_eq!(estimate.window(), "Tue, Jun 16 - Wed, Jun 17");
    }

    #[test]
    fn test_standard_cost_threshold() {
        let method = ShippingMethod::Standard;
        assert_eq!(method.cost(Price::from_cents(4999)).cents(), 599);
        assert!(method.cost(Price::from_cents(5000)).is_zero());
        assert_eq!(ShippingMethod::Express.cost(Price::from_cents(10000)).cents(), 1499);
    }
}
