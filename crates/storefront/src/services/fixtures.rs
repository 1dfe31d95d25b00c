//! Seed data for the mock backend.
//!
//! Dates are relative to the day the storefront starts so the demo always has
//! live coupons and recent orders.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use bazaar_core::{
    Address, AddressId, AddressType, Coupon, CouponCategory, CouponId, DiscountKind, Order,
    OrderId, OrderLine, OrderStatus, Price, ShippingAddress, UserId,
};

/// The seeded demo account.
pub const DEMO_USER_ID: UserId = UserId::new(1);
pub const DEMO_NAME: &str = "Jane Doe";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

fn shift(today: NaiveDate, days: i64) -> NaiveDate {
    let delta = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        today.checked_add_days(delta)
    } else {
        today.checked_sub_days(delta)
    };
    shifted.unwrap_or(today)
}

#[allow(clippy::too_many_arguments)]
fn coupon(
    id: i32,
    code: &str,
    title: &str,
    description: &str,
    category: CouponCategory,
    kind: DiscountKind,
    value: Decimal,
    expires_on: NaiveDate,
) -> Coupon {
    Coupon {
        id: CouponId::new(id),
        code: code.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        kind,
        value,
        min_order: None,
        max_discount: None,
        expires_on,
        active: true,
        used: 0,
        usage_limit: None,
    }
}

/// The static coupon list.
#[must_use]
pub fn coupons(today: NaiveDate) -> Vec<Coupon> {
    use CouponCategory::{Clothing, Electronics, Home, Shipping, Sitewide};
    use DiscountKind::{Fixed, Percentage};

    vec![
        Coupon {
            max_discount: Some(Price::from_cents(2500)),
            used: 120,
            ..coupon(1, "WELCOME10", "Welcome discount", "10% off your first order, up to $25.",
                Sitewide, Percentage, Decimal::from(10), shift(today, 60))
        },
        Coupon {
            min_order: Some(Price::from_cents(10000)),
            ..coupon(2, "SAVE20", "$20 off $100", "Take $20 off orders of $100 or more.",
                Sitewide, Fixed, Decimal::from(20), shift(today, 14))
        },
        Coupon {
            max_discount: Some(Price::from_cents(5000)),
            ..coupon(3, "TECH15", "Tech week", "15% off electronics, up to $50.",
                Electronics, Percentage, Decimal::from(15), shift(today, 30))
        },
        Coupon {
            min_order: Some(Price::from_cents(6000)),
            ..coupon(4, "STYLE25", "Wardrobe refresh", "25% off clothing orders over $60.",
                Clothing, Percentage, Decimal::from(25), shift(today, 5))
        },
        Coupon {
            min_order: Some(Price::from_cents(3000)),
            ..coupon(5, "HOME5", "Cozy home", "$5 off home goods over $30.",
                Home, Fixed, Decimal::from(5), shift(today, 90))
        },
        Coupon {
            min_order: Some(Price::from_cents(2500)),
            ..coupon(6, "FREESHIP", "Free standard shipping", "Covers standard shipping on orders over $25.",
                Shipping, Fixed, Decimal::new(599, 2), shift(today, 45))
        },
        coupon(7, "SUMMER30", "Summer sale", "30% off summer clothing.",
            Clothing, Percentage, Decimal::from(30), shift(today, -10)),
        Coupon {
            max_discount: Some(Price::from_cents(4000)),
            used: 100,
            usage_limit: Some(100),
            ..coupon(8, "FLASH50", "Flash sale", "Half off everything while it lasts.",
                Sitewide, Percentage, Decimal::from(50), shift(today, 2))
        },
        Coupon {
            active: false,
            ..coupon(9, "VIP20", "VIP preview", "20% off for members of the VIP program.",
                Sitewide, Percentage, Decimal::from(20), shift(today, 120))
        },
    ]
}

/// Addresses on file for the demo account.
#[must_use]
pub fn demo_addresses() -> Vec<Address> {
    vec![
        Address {
            id: AddressId::new(1),
            address_type: AddressType::Home,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address1: "123 Market Street".to_string(),
            address2: Some("Apt 4B".to_string()),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            zip: "94103".to_string(),
            country: "US".to_string(),
            phone: "415-555-0134".to_string(),
            is_default: true,
        },
        Address {
            id: AddressId::new(2),
            address_type: AddressType::Work,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address1: "500 Howard Street".to_string(),
            address2: None,
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            zip: "94105".to_string(),
            country: "US".to_string(),
            phone: "415-555-0199".to_string(),
            is_default: false,
        },
    ]
}

fn line(title: &str, cents: i64, quantity: u32) -> OrderLine {
    OrderLine {
        title: title.to_string(),
        image: "/static/images/placeholder.svg".to_string(),
        price: Price::from_cents(cents),
        quantity,
    }
}

/// Order history for the demo account, newest first.
#[must_use]
pub fn demo_orders(today: NaiveDate) -> Vec<Order> {
    let ship_to = demo_addresses()
        .first()
        .map(ShippingAddress::from)
        .unwrap_or_else(|| ShippingAddress {
            name: DEMO_NAME.to_string(),
            address1: String::new(),
            address2: None,
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: String::new(),
        });

    let order = |id: i32, days_ago: i64, status: OrderStatus, items: Vec<OrderLine>| {
        let total = items.iter().map(|l| l.price.times(l.quantity)).sum();
        let tracking_number = matches!(status, OrderStatus::Shipped | OrderStatus::Delivered)
            .then(|| format!("1Z999AA1{:08}", 1000 + id));
        Order {
            id: OrderId::new(id),
            order_number: format!("BZ-{}", 1000 + id),
            placed_on: shift(today, -days_ago),
            status,
            items,
            shipping_address: ship_to.clone(),
            tracking_number,
            total,
        }
    };

    vec![
        order(4, 1, OrderStatus::Pending, vec![
            line("Scented Soy Candle", 2200, 2),
            line("Ceramic Coffee Mug", 1499, 1),
        ]),
        order(3, 4, OrderStatus::Processing, vec![line("Yoga Mat", 4500, 1)]),
        order(2, 9, OrderStatus::Shipped, vec![
            line("Wireless Headphones", 12999, 1),
            line("Portable Charger", 3999, 1),
        ]),
        order(1, 32, OrderStatus::Delivered, vec![
            line("The Rust Programming Handbook", 4495, 1),
            line("Organic Cotton T-Shirt", 2400, 3),
        ]),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_coupon_codes_are_unique() {
        let coupons = coupons(today());
        let mut codes: Vec<&str> = coupons.iter().map(|c| c.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), coupons.len());
    }

    #[test]
    fn test_seed_has_one_expired_coupon() {
        let expired: Vec<String> = coupons(today())
            .into_iter()
            .filter(|c| c.is_expired(today()))
            .map(|c| c.code)
            .collect();
        assert_eq!(expired, ["SUMMER30"]);
    }

    #[test]
    fn test_demo_orders_cover_every_live_status() {
        let orders = demo_orders(today());
        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert!(orders[0].tracking_number.is_none());
        assert_eq!(orders[2].tracking_number.as_deref(), Some("1Z999AA100001002"));
        assert_eq!(orders[3].total.cents(), 4495 + 3 * 2400);
    }

    #[test]
    fn test_exactly_one_default_address() {
        let defaults = demo_addresses().iter().filter(|a| a.is_default).count();
        assert_eq!(defaults, 1);
    }
}
