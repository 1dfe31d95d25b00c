//! Mock order, address and coupon backend.
//!
//! Every call sleeps for the configured latency before touching the data so
//! pages behave as if they were talking to a remote API.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::instrument;

use bazaar_core::{
    Address, AddressId, Cart, Coupon, NewAddress, Order, OrderId, OrderLine, OrderStatus, Price,
    ShippingAddress, UserId,
};

use super::fixtures;

/// Errors returned by the mock backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend state lock poisoned")]
    LockPoisoned,
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("cannot place an order for an empty cart")]
    EmptyCart,
}

#[derive(Default)]
struct BackendData {
    orders: HashMap<UserId, Vec<Order>>,
    addresses: HashMap<UserId, Vec<Address>>,
    next_order_id: i32,
    next_address_id: i32,
}

/// Checkout details passed to [`MockBackend::place_order`].
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub shipping_address: ShippingAddress,
    pub total: Price,
    pub placed_on: NaiveDate,
}

/// In-memory stand-in for the order service.
pub struct MockBackend {
    latency: Duration,
    data: RwLock<BackendData>,
}

impl MockBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            data: RwLock::new(BackendData {
                next_order_id: 1,
                next_address_id: 1,
                ..BackendData::default()
            }),
        }
    }

    /// Create a backend holding the demo account's orders and addresses.
    #[must_use]
    pub fn seeded(latency: Duration, today: NaiveDate) -> Self {
        let orders = fixtures::demo_orders(today);
        let addresses = fixtures::demo_addresses();
        let next_order_id = orders.iter().map(|o| o.id.as_i32()).max().unwrap_or(0) + 1;
        let next_address_id = addresses.iter().map(|a| a.id.as_i32()).max().unwrap_or(0) + 1;

        let mut data = BackendData {
            next_order_id,
            next_address_id,
            ..BackendData::default()
        };
        data.orders.insert(fixtures::DEMO_USER_ID, orders);
        data.addresses.insert(fixtures::DEMO_USER_ID, addresses);

        Self {
            latency,
            data: RwLock::new(data),
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Orders placed by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::LockPoisoned` if the store is unusable.
    #[instrument(skip(self))]
    pub async fn fetch_user_orders(&self, user_id: UserId) -> Result<Vec<Order>, BackendError> {
        self.delay().await;
        let data = self.data.read().map_err(|_| BackendError::LockPoisoned)?;
        Ok(data.orders.get(&user_id).cloned().unwrap_or_default())
    }

    /// Addresses saved by a user, default first.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::LockPoisoned` if the store is unusable.
    #[instrument(skip(self))]
    pub async fn fetch_user_addresses(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Address>, BackendError> {
        self.delay().await;
        let data = self.data.read().map_err(|_| BackendError::LockPoisoned)?;
        let mut addresses = data.addresses.get(&user_id).cloned().unwrap_or_default();
        addresses.sort_by_key(|address| !address.is_default);
        Ok(addresses)
    }

    /// Save a new address for a user.
    ///
    /// The first address a user saves is always the default; saving a new
    /// default clears the flag on the previous one.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MissingFields` if required fields are blank.
    #[instrument(skip(self, address))]
    pub async fn add_user_address(
        &self,
        user_id: UserId,
        address: NewAddress,
    ) -> Result<Address, BackendError> {
        let missing = address.missing_fields();
        if !missing.is_empty() {
            return Err(BackendError::MissingFields(missing));
        }

        self.delay().await;
        let mut data = self.data.write().map_err(|_| BackendError::LockPoisoned)?;
        let id = AddressId::new(data.next_address_id);
        data.next_address_id += 1;

        let saved = data.addresses.entry(user_id).or_default();
        let mut created = Address::from_new(id, address);
        if saved.is_empty() {
            created.is_default = true;
        }
        if created.is_default {
            for existing in saved.iter_mut() {
                existing.is_default = false;
            }
        }
        saved.push(created.clone());
        drop(data);

        tracing::info!(%user_id, address_id = %id, "Address saved");
        Ok(created)
    }

    /// Place an order for the cart contents.
    ///
    /// Guest orders (`user_id == None`) get an order number but are not kept
    /// in any history.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::EmptyCart` for an empty cart.
    #[instrument(skip(self, cart, request))]
    pub async fn place_order(
        &self,
        user_id: Option<UserId>,
        cart: &Cart,
        request: OrderRequest,
    ) -> Result<Order, BackendError> {
        if cart.is_empty() {
            return Err(BackendError::EmptyCart);
        }

        self.delay().await;
        let mut data = self.data.write().map_err(|_| BackendError::LockPoisoned)?;
        let id = OrderId::new(data.next_order_id);
        data.next_order_id += 1;

        let order = Order {
            id,
            order_number: format!("BZ-{}", 1000 + id.as_i32()),
            placed_on: request.placed_on,
            status: OrderStatus::Pending,
            items: cart.items.iter().map(OrderLine::from).collect(),
            shipping_address: request.shipping_address,
            tracking_number: None,
            total: request.total,
        };

        if let Some(user_id) = user_id {
            data.orders.entry(user_id).or_default().insert(0, order.clone());
        }
        drop(data);

        tracing::info!(order_number = %order.order_number, total = %order.total, "Order placed");
        Ok(order)
    }

    /// The static coupon list.
    #[instrument(skip(self))]
    pub async fn list_coupons(&self, today: NaiveDate) -> Vec<Coupon> {
        self.delay().await;
        fixtures::coupons(today)
    }

    /// Look up a coupon by code (case-insensitive) without the simulated delay.
    #[must_use]
    pub fn find_coupon(&self, code: &str, today: NaiveDate) -> Option<Coupon> {
        let code = code.trim();
        fixtures::coupons(today)
            .into_iter()
            .find(|coupon| coupon.code.eq_ignore_ascii_case(code))
    }

    /// Pretend to deliver a contact form message.
    #[instrument(skip(self, message))]
    pub async fn send_contact_message(&self, email: &str, message: &str) {
        self.delay().await;
        tracing::info!(email, length = message.len(), "Contact message received");
    }
}
