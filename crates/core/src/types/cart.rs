//! Cart and wishlist contents.
//!
//! Both are plain values: the storefront loads them from the session, calls
//! a mutator, and writes the whole value back.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// A cart line.
///
/// Title, image and price are captured when the line is created so the cart
/// renders without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line for a product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            image: product.image.clone(),
            unit_price: product.price,
            quantity: quantity.min(MAX_LINE_QUANTITY),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increases quantity)
/// - Quantity is between 1 and `MAX_LINE_QUANTITY` (setting 0 removes the line)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add a line, merging with an existing line for the same product.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_LINE_QUANTITY);
            }
            None => self.items.push(item),
        }
    }

    /// Set the quantity of a line. Zero removes it.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        self.items
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity = quantity.min(MAX_LINE_QUANTITY))
            .is_some()
    }

    /// Remove a line. Returns `false` if the product was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.product_id != product_id);
        self.items.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Price,
}

impl WishlistItem {
    /// Create a wishlist entry for a product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            image: product.image.clone(),
            price: product.price,
        }
    }
}

impl From<&WishlistItem> for CartItem {
    fn from(item: &WishlistItem) -> Self {
        Self {
            product_id: item.product_id,
            title: item.title.clone(),
            image: item.image.clone(),
            unit_price: item.price,
            quantity: 1,
        }
    }
}

/// Saved products, most recently saved first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    pub items: Vec<WishlistItem>,
}

impl Wishlist {
    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Save the product if absent, remove it if present.
    ///
    /// Returns `true` if the product is saved after the call.
    pub fn toggle(&mut self, item: WishlistItem) -> bool {
        if self.remove(item.product_id).is_some() {
            false
        } else {
            self.items.insert(0, item);
            true
        }
    }

    /// Remove a product, returning the removed entry.
    pub fn remove(&mut self, product_id: ProductId) -> Option<WishlistItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
