//! Order history records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Address, CartItem, OrderId, OrderStatus, Price, TransitionError};

/// A purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub title: String,
    pub image: String,
    pub price: Price,
    pub quantity: u32,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            image: item.image.clone(),
            price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Shipping address copied onto the order when it is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl From<&Address> for ShippingAddress {
    fn from(address: &Address) -> Self {
        Self {
            name: address.full_name(),
            address1: address.address1.clone(),
            address2: address.address2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
            country: address.country.clone(),
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub placed_on: NaiveDate,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub tracking_number: Option<String>,
    pub total: Price,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Cancel the order in place.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotCancellable` unless the order is pending.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.status = self.status.cancel()?;
        Ok(())
    }
}
