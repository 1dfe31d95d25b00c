//! Order totals shared by the cart and checkout pages.

use chrono::NaiveDate;

use bazaar_core::{Cart, Coupon, CouponError, Price, ShippingMethod};

use super::MockBackend;

/// Subtotal, coupon discount, shipping and grand total for a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Compute totals. Shipping is charged on the undiscounted subtotal and
    /// is zero for an empty cart.
    #[must_use]
    pub fn compute(
        cart: &Cart,
        coupon: Option<&Coupon>,
        method: ShippingMethod,
        today: NaiveDate,
    ) -> Self {
        let subtotal = cart.subtotal();
        let discount = coupon.map_or_else(Price::zero, |coupon| coupon.discount_for(subtotal, today));
        let shipping = if cart.is_empty() {
            Price::zero()
        } else {
            method.cost(subtotal)
        };

        Self {
            subtotal,
            discount,
            shipping,
            total: subtotal.saturating_sub(discount) + shipping,
        }
    }
}

/// Resolve an applied coupon code against the coupon list.
///
/// # Errors
///
/// Returns why the coupon cannot be used today.
pub fn resolve_coupon(
    backend: &MockBackend,
    code: &str,
    today: NaiveDate,
) -> Result<Coupon, CouponError> {
    let coupon = backend
        .find_coupon(code, today)
        .ok_or_else(|| CouponError::UnknownCode(code.to_string()))?;
    coupon.check_applicable(today)?;
    Ok(coupon)
}

/// Why an otherwise valid coupon gives no discount on this subtotal.
#[must_use]
pub fn minimum_notice(coupon: &Coupon, subtotal: Price) -> Option<String> {
    let min = coupon.min_order?;
    (subtotal < min).then(|| {
        format!(
            "Add {} more to use {} (minimum order {min})",
            min.saturating_sub(subtotal),
            coupon.code
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use bazaar_core::{CartItem, ProductId};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 12).unwrap()
    }

    fn cart(cents: i64) -> Cart {
        let mut cart = Cart::default();
        cart.add(CartItem {
            product_id: ProductId::new(1),
            title: "Lamp".to_string(),
            image: String::new(),
            unit_price: Price::from_cents(cents),
            quantity: 1,
        });
        cart
    }

    fn backend() -> MockBackend {
        MockBackend::new(Duration::ZERO)
    }

    #[test]
    fn test_totals_without_coupon() {
        let totals = OrderTotals::compute(&cart(4000), None, ShippingMethod::Standard, today());
        assert_eq!(totals.shipping, Price::from_cents(599));
        assert_eq!(totals.total, Price::from_cents(4599));

        let totals = OrderTotals::compute(&cart(6000), None, ShippingMethod::Standard, today());
        assert_eq!(totals.shipping, Price::zero());
        assert_eq!(totals.total, Price::from_cents(6000));
    }

    #[test]
    fn test_totals_with_percentage_coupon() {
        let welcome = resolve_coupon(&backend(), "welcome10", today()).unwrap();
        let totals =
            OrderTotals::compute(&cart(8000), Some(&welcome), ShippingMethod::Express, today());
        assert_eq!(totals.discount, Price::from_cents(800));
        assert_eq!(totals.total, Price::from_cents(8000 - 800 + 1499));
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let totals =
            OrderTotals::compute(&Cart::default(), None, ShippingMethod::Express, today());
        assert_eq!(totals.total, Price::zero());
    }

    #[test]
    fn test_resolve_coupon_errors() {
        let backend = backend();
        assert!(matches!(
            resolve_coupon(&backend, "NOPE", today()),
            Err(CouponError::UnknownCode(_))
        ));
        assert!(matches!(
            resolve_coupon(&backend, "SUMMER30", today()),
            Err(CouponError::Expired(_))
        ));
        assert!(matches!(
            resolve_coupon(&backend, "FLASH50", today()),
            Err(CouponError::Exhausted(_))
        ));
        assert!(matches!(
            resolve_coupon(&backend, "VIP20", today()),
            Err(CouponError::Inactive(_))
        ));
    }

    #[test]
    fn test_minimum_notice() {
        let save20 = resolve_coupon(&backend(), "SAVE20", today()).unwrap();
        assert_eq!(
            minimum_notice(&save20, Price::from_cents(7500)).as_deref(),
            Some("Add $25.00 more to use SAVE20 (minimum order $100.00)")
        );
        assert_eq!(minimum_notice(&save20, Price::from_cents(10000)), None);
    }
}
