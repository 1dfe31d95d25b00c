//! Shopping cart.

use bazaar_core::{Cart, CartItem, ProductId};

use super::{Container, Persisted};
use crate::models::session_keys;

impl Persisted for Cart {
    const KEY: &'static str = session_keys::CART;
}

pub type CartContainer = Container<Cart>;

impl Container<Cart> {
    /// Add a line, merging with an existing line for the same product.
    pub async fn add(&mut self, item: CartItem) {
        self.update(|cart| cart.add(item)).await;
    }

    /// Set a line's quantity; zero removes it.
    pub async fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        self.update(|cart| cart.set_quantity(product_id, quantity))
            .await
    }

    /// Remove a line.
    pub async fn remove(&mut self, product_id: ProductId) -> bool {
        self.update(|cart| cart.remove(product_id)).await
    }

    /// Empty the cart.
    pub async fn clear(&mut self) {
        self.update(Cart::clear).await;
    }
}
