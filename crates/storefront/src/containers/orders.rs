//! Orders cancelled during this session.
//!
//! Cancellation never reaches the backend: the session records which orders
//! were cancelled and the overlay is applied to every freshly fetched list.

use std::collections::BTreeSet;

use bazaar_core::{Order, OrderId, OrderStatus, TransitionError};
use serde::{Deserialize, Serialize};

use super::{Container, Persisted};
use crate::models::session_keys;

/// IDs of orders the customer cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CancelledOrders(BTreeSet<OrderId>);

impl CancelledOrders {
    /// Whether an order was cancelled.
    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.0.contains(&id)
    }

    /// Mark the given orders as cancelled.
    pub fn apply(&self, orders: &mut [Order]) {
        for order in orders.iter_mut().filter(|order| self.contains(order.id)) {
            order.status = OrderStatus::Cancelled;
        }
    }

    /// Cancel an order, checking its status after the overlay.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotCancellable` unless the order is pending.
    pub fn cancel(&mut self, order: &Order) -> Result<(), TransitionError> {
        let mut order = order.clone();
        self.apply(std::slice::from_mut(&mut order));
        order.cancel()?;
        self.0.insert(order.id);
        Ok(())
    }
}

impl Persisted for CancelledOrders {
    const KEY: &'static str = session_keys::CANCELLED_ORDERS;
}

pub type OrdersContainer = Container<CancelledOrders>;

impl Container<CancelledOrders> {
    /// Cancel an order and persist the overlay.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotCancellable` unless the order is pending.
    pub async fn cancel(&mut self, order: &Order) -> Result<(), TransitionError> {
        let mut overlay = self.value.clone();
        overlay.cancel(order)?;
        self.replace(overlay).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Price, ShippingAddress};
    use chrono::NaiveDate;

    use super::*;
    use crate::containers::testing;

    fn order(id: i32, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            order_number: format!("BZ-{}", 1000 + id),
            placed_on: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            status,
            items: Vec::new(),
            shipping_address: ShippingAddress {
                name: "Jane Doe".to_string(),
                address1: "1 Market St".to_string(),
                address2: None,
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip: "94103".to_string(),
                country: "US".to_string(),
            },
            tracking_number: None,
            total: Price::from_cents(1000),
        }
    }

    #[test]
    fn test_cancel_pending_only() {
        let mut cancelled = CancelledOrders::default();
        assert!(cancelled.cancel(&order(1, OrderStatus::Pending)).is_ok());
        assert_eq!(
            cancelled.cancel(&order(2, OrderStatus::Shipped)),
            Err(TransitionError::NotCancellable {
                from: OrderStatus::Shipped
            })
        );
        assert!(cancelled.contains(OrderId::new(1)));
        assert!(!cancelled.contains(OrderId::new(2)));
    }

    #[test]
    fn test_cancel_twice_fails() {
        let mut cancelled = CancelledOrders::default();
        let pending = order(1, OrderStatus::Pending);
        cancelled.cancel(&pending).unwrap();
        assert!(cancelled.cancel(&pending).is_err());
    }

    #[test]
    fn test_apply_overlays_status() {
        let mut cancelled = CancelledOrders::default();
        cancelled.cancel(&order(4, OrderStatus::Pending)).unwrap();

        let mut orders = vec![order(4, OrderStatus::Pending), order(3, OrderStatus::Processing)];
        cancelled.apply(&mut orders);

        assert_eq!(orders.first().unwrap().status, OrderStatus::Cancelled);
        assert_eq!(orders.get(1).unwrap().status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_container_persists_overlay() {
        let storage = testing::storage();
        let mut container = OrdersContainer::load(storage.clone()).await;
        container
            .cancel(&order(4, OrderStatus::Pending))
            .await
            .unwrap();

        let reloaded = OrdersContainer::load(storage).await;
        assert!(reloaded.contains(OrderId::new(4)));
    }
}
