//! Coupons: filtering, sorting and discount math.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CouponId, CurrencyCode, Price};

/// Reasons a coupon cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponError {
    #[error("no coupon matches code {0}")]
    UnknownCode(String),
    #[error("coupon {0} has expired")]
    Expired(String),
    #[error("coupon {0} is not active")]
    Inactive(String),
    #[error("coupon {0} has reached its usage limit")]
    Exhausted(String),
}

/// How the coupon value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percentage of the subtotal.
    Percentage,
    /// `value` is a fixed amount in dollars.
    Fixed,
}

/// Coupon grouping shown as filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponCategory {
    Sitewide,
    Electronics,
    Clothing,
    Home,
    Shipping,
}

impl CouponCategory {
    /// All categories, in tab order.
    pub const ALL: [Self; 5] = [
        Self::Sitewide,
        Self::Electronics,
        Self::Clothing,
        Self::Home,
        Self::Shipping,
    ];

    /// Machine-readable value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sitewide => "sitewide",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Home => "home",
            Self::Shipping => "shipping",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sitewide => "Sitewide",
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Home => "Home",
            Self::Shipping => "Shipping",
        }
    }
}

impl std::str::FromStr for CouponCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("invalid coupon category: {s}"))
    }
}

/// A promotional coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: CouponCategory,
    pub kind: DiscountKind,
    pub value: Decimal,
    pub min_order: Option<Price>,
    pub max_discount: Option<Price>,
    /// Last day the coupon is valid.
    pub expires_on: NaiveDate,
    pub active: bool,
    pub used: u32,
    pub usage_limit: Option<u32>,
}

impl Coupon {
    /// Whether the expiry date is before `today`.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on < today
    }

    /// Whether the usage limit has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used >= limit)
    }

    /// Days left until expiry, or `None` once expired.
    #[must_use]
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        let days = (self.expires_on - today).num_days();
        (days >= 0).then_some(days)
    }

    /// Check the coupon can be applied today.
    ///
    /// # Errors
    ///
    /// Returns the first reason the coupon is unusable.
    pub fn check_applicable(&self, today: NaiveDate) -> Result<(), CouponError> {
        if !self.active {
            return Err(CouponError::Inactive(self.code.clone()));
        }
        if self.is_expired(today) {
            return Err(CouponError::Expired(self.code.clone()));
        }
        if self.is_exhausted() {
            return Err(CouponError::Exhausted(self.code.clone()));
        }
        Ok(())
    }

    /// Discount this coupon gives on `subtotal` today.
    ///
    /// Zero when the coupon is unusable or the minimum order is not met.
    /// Percentage discounts are capped at `max_discount`; no discount exceeds
    /// the subtotal.
    #[must_use]
    pub fn discount_for(&self, subtotal: Price, today: NaiveDate) -> Price {
        if self.check_applicable(today).is_err() {
            return Price::zero();
        }
        if self.min_order.is_some_and(|min| subtotal < min) {
            return Price::zero();
        }
        self.face_value(subtotal)
    }

    /// Discount on `subtotal` ignoring expiry, usage and the minimum order.
    #[must_use]
    pub fn face_value(&self, subtotal: Price) -> Price {
        let raw = match self.kind {
            DiscountKind::Percentage => {
                let discount = subtotal.percent(self.value);
                match self.max_discount {
                    Some(cap) if discount > cap => cap,
                    _ => discount,
                }
            }
            DiscountKind::Fixed => Price::new(self.value, subtotal.currency_code),
        };

        if raw > subtotal { subtotal } else { raw }
    }

    /// Short value label, e.g. "20% off" or "$10.00 off".
    #[must_use]
    pub fn value_label(&self) -> String {
        match self.kind {
            DiscountKind::Percentage => format!("{}% off", self.value.normalize()),
            DiscountKind::Fixed => format!("{} off", Price::new(self.value, CurrencyCode::USD)),
        }
    }
}

/// Coupon list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponFilter {
    /// Case-insensitive substring of the title or code.
    pub search: String,
    pub category: Option<CouponCategory>,
    pub show_expired: bool,
}

impl CouponFilter {
    /// Whether a coupon passes every filter.
    #[must_use]
    pub fn matches(&self, coupon: &Coupon, today: NaiveDate) -> bool {
        if !self.show_expired && coupon.is_expired(today) {
            return false;
        }
        if self
            .category
            .is_some_and(|category| coupon.category != category)
        {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || coupon.title.to_lowercase().contains(&needle)
            || coupon.code.to_lowercase().contains(&needle)
    }

    /// Coupons passing every filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, coupons: &'a [Coupon], today: NaiveDate) -> Vec<&'a Coupon> {
        coupons
            .iter()
            .filter(|coupon| self.matches(coupon, today))
            .collect()
    }
}

/// Order size at which percentage and fixed coupons are compared.
pub const VALUE_REFERENCE_SUBTOTAL: Price = Price::from_cents(10_000);

/// Coupon list ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CouponSort {
    /// Soonest expiry first.
    #[default]
    Expiring,
    /// Largest value first.
    Value,
    /// Alphabetical by code.
    Code,
}

impl CouponSort {
    /// Parse from URL parameter value, defaulting to `Expiring`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "value" => Self::Value,
            "code" => Self::Code,
            _ => Self::Expiring,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expiring => "expiring",
            Self::Value => "value",
            Self::Code => "code",
        }
    }

    /// Sort coupons in place.
    pub fn apply(self, coupons: &mut [&Coupon]) {
        match self {
            Self::Expiring => coupons.sort_by_key(|coupon| coupon.expires_on),
            Self::Value => coupons.sort_by_key(|coupon| {
                core::cmp::Reverse(coupon.face_value(VALUE_REFERENCE_SUBTOTAL))
            }),
            Self::Code => coupons.sort_by(|a, b| a.code.cmp(&b.code)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn coupon(code: &str, category: CouponCategory, expires_on: NaiveDate) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: code.to_string(),
            title: format!("{code} deal"),
            description: String::new(),
            category,
            kind: DiscountKind::Percentage,
            value: Decimal::from(20),
            min_order: None,
            max_discount: None,
            expires_on,
            active: true,
            used: 0,
            usage_limit: None,
        }
    }

    fn sample() -> Vec<Coupon> {
        let future = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        vec![
            coupon("SAVE20", CouponCategory::Sitewide, future),
            coupon("GADGET10", CouponCategory::Electronics, future),
            coupon("WINTER", CouponCategory::Clothing, past),
        ]
    }

    fn codes(list: &[&Coupon]) -> Vec<String> {
        list.iter().map(|c| c.code.clone()).collect()
    }

    #[test]
    fn test_expired_excluded_unless_requested() {
        let coupons = sample();
        let filter = CouponFilter::default();
        assert_eq!(codes(&filter.apply(&coupons, today())), ["SAVE20", "GADGET10"]);

        let filter = CouponFilter {
            show_expired: true,
            ..CouponFilter::default()
        };
        assert_eq!(filter.apply(&coupons, today()).len(), 3);
    }

    #[test]
    fn test_expiry_day_itself_is_valid() {
        let c = coupon("LAST", CouponCategory::Home, today());
        assert!(!c.is_expired(today()));
        assert_eq!(c.days_left(today()), Some(0));
    }

    #[test]
    fn test_category_filter() {
        let coupons = sample();
        let filter = CouponFilter {
            category: Some(CouponCategory::Electronics),
            ..CouponFilter::default()
        };
        assert_eq!(codes(&filter.apply(&coupons, today())), ["GADGET10"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_or_code() {
        let coupons = sample();
        let by_code = CouponFilter {
            search: "save".to_string(),
            ..CouponFilter::default()
        };
        assert_eq!(codes(&by_code.apply(&coupons, today())), ["SAVE20"]);

        let by_title = CouponFilter {
            search: "GADGET10 DEAL".to_string(),
            ..CouponFilter::default()
        };
        assert_eq!(codes(&by_title.apply(&coupons, today())), ["GADGET10"]);
    }

    #[test]
    fn test_percentage_discount_capped() {
        let mut c = coupon("BIG", CouponCategory::Sitewide, today());
        c.max_discount = Some(Price::from_cents(1500));
        assert_eq!(c.discount_for(Price::from_cents(5000), today()).cents(), 1000);
        assert_eq!(c.discount_for(Price::from_cents(20000), today()).cents(), 1500);
    }

    #[test]
    fn test_minimum_order_and_fixed_cap() {
        let mut c = coupon("TENOFF", CouponCategory::Sitewide, today());
        c.kind = DiscountKind::Fixed;
        c.value = Decimal::from(10);
        c.min_order = Some(Price::from_cents(3000));

        assert!(c.discount_for(Price::from_cents(2999), today()).is_zero());
        assert_eq!(c.discount_for(Price::from_cents(3000), today()).cents(), 1000);

        c.min_order = None;
        assert_eq!(c.discount_for(Price::from_cents(400), today()).cents(), 400);
    }

    #[test]
    fn test_unusable_coupons_give_nothing() {
        let mut c = coupon("OLD", CouponCategory::Sitewide, today());
        c.usage_limit = Some(5);
        c.used = 5;
        assert_eq!(
            c.check_applicable(today()),
            Err(CouponError::Exhausted("OLD".to_string()))
        );
        assert!(c.discount_for(Price::from_cents(10000), today()).is_zero());
    }

    #[test]
    fn test_sort_and_labels() {
        let coupons = sample();
        let mut list: Vec<&Coupon> = coupons.iter().collect();
        CouponSort::Code.apply(&mut list);
        assert_eq!(codes(&list), ["GADGET10", "SAVE20", "WINTER"]);

        CouponSort::Expiring.apply(&mut list);
        assert_eq!(list.first().unwrap().code, "WINTER");

        let mut fixed = coupon("FIVE", CouponCategory::Home, today());
        fixed.kind = DiscountKind::Fixed;
        fixed.value = Decimal::new(500, 2);
        assert_eq!(fixed.value_label(), "$5.00 off");
        assert_eq!(coupons.first().unwrap().value_label(), "20% off");
    }

    #[test]
    fn test_value_sort_compares_percent_and_fixed_in_dollars() {
        let future = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let percent = |code: &str, value: i64, cap: Option<i64>| Coupon {
            value: Decimal::from(value),
            max_discount: cap.map(Price::from_cents),
            ..coupon(code, CouponCategory::Sitewide, future)
        };
        let fixed = |code: &str, cents: i64| Coupon {
            kind: DiscountKind::Fixed,
            value: Decimal::new(cents, 2),
            ..coupon(code, CouponCategory::Sitewide, future)
        };

        let coupons = vec![
            percent("PCT10", 10, None),
            fixed("FIXED50", 5000),
            percent("PCT60", 60, None),
            percent("PCT90CAP", 90, Some(2000)),
            fixed("FIXED15", 1500),
        ];
        let mut list: Vec<&Coupon> = coupons.iter().collect();
        CouponSort::Value.apply(&mut list);
        // $60, $50, $20 (capped), $15, $10 on a $100 order.
        assert_eq!(codes(&list), ["PCT60", "FIXED50", "PCT90CAP", "FIXED15", "PCT10"]);
    }
}
