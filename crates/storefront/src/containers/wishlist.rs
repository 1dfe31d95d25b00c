//! Saved products.

use bazaar_core::{CartItem, ProductId, Wishlist, WishlistItem};

use super::{CartContainer, Container, Persisted};
use crate::models::session_keys;

impl Persisted for Wishlist {
    const KEY: &'static str = session_keys::WISHLIST;
}

pub type WishlistContainer = Container<Wishlist>;

impl Container<Wishlist> {
    /// Save or unsave a product. Returns `true` if it is saved afterwards.
    pub async fn toggle(&mut self, item: WishlistItem) -> bool {
        self.update(|wishlist| wishlist.toggle(item)).await
    }

    /// Remove a product. Returns `false` if it was not saved.
    pub async fn remove(&mut self, product_id: ProductId) -> bool {
        self.update(|wishlist| wishlist.remove(product_id).is_some())
            .await
    }

    /// Move a saved product into the cart with quantity one.
    ///
    /// Returns `false` (touching neither container) if it was not saved.
    pub async fn move_to_cart(&mut self, product_id: ProductId, cart: &mut CartContainer) -> bool {
        if !self.contains(product_id) {
            return false;
        }
        let Some(item) = self.update(|wishlist| wishlist.remove(product_id)).await else {
            return false;
        };
        cart.add(CartItem::from(&item)).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use bazaar_core::Price;

    use super::*;
    use crate::containers::testing;

    fn lamp() -> WishlistItem {
        WishlistItem {
            product_id: ProductId::new(4),
            title: "Lamp".to_string(),
            image: String::new(),
            price: Price::from_cents(4500),
        }
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let storage = testing::storage();
        let mut wishlist = WishlistContainer::load(storage.clone()).await;
        assert!(wishlist.toggle(lamp()).await);

        let reloaded = WishlistContainer::load(storage.clone()).await;
        assert!(reloaded.contains(ProductId::new(4)));

        assert!(!wishlist.toggle(lamp()).await);
        let reloaded = WishlistContainer::load(storage).await;
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn test_move_to_cart() {
        let storage = testing::storage();
        let mut wishlist = WishlistContainer::load(storage.clone()).await;
        let mut cart = CartContainer::load(storage.clone()).await;
        wishlist.toggle(lamp()).await;

        assert!(wishlist.move_to_cart(ProductId::new(4), &mut cart).await);
        assert!(!wishlist.move_to_cart(ProductId::new(4), &mut cart).await);

        let wishlist = WishlistContainer::load(storage.clone()).await;
        let cart = CartContainer::load(storage).await;
        assert!(wishlist.is_empty());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal().cents(), 4500);
    }
}
