//! Catalog products.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Stock at or below this count is reported as low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Home,
    Books,
    Sports,
}

impl ProductCategory {
    /// All categories, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Electronics,
        Self::Clothing,
        Self::Home,
        Self::Books,
        Self::Sports,
    ];

    /// Machine-readable value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Home => "home",
            Self::Books => "books",
            Self::Sports => "sports",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Home => "Home & Kitchen",
            Self::Books => "Books",
            Self::Sports => "Sports & Outdoors",
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// Stock level bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Bucket a stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Machine-readable value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::LowStock => "Low stock",
            Self::OutOfStock => "Out of stock",
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Self::InStock),
            "low_stock" => Ok(Self::LowStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            _ => Err(format!("invalid stock status: {s}")),
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub image: String,
    pub stock: u32,
    /// Average rating out of 5.
    pub rating: f32,
    pub tags: Vec<String>,
}

impl Product {
    /// Stock level bucket.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product is discounted against its compare-at price.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.compare_at_price
            .is_some_and(|compare_at| compare_at > self.price)
    }
}

/// Product listing sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl ProductSort {
    /// Parse from URL parameter value, defaulting to `Featured`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "rating" => Self::Rating,
            _ => Self::Featured,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
        }
    }

    /// Sort products in place. `Featured` keeps catalog order.
    pub fn apply(self, products: &mut [&Product]) {
        match self {
            Self::Featured => {}
            Self::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, cents: i64, rating: f32, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            category: ProductCategory::Books,
            price: Price::from_cents(cents),
            compare_at_price: None,
            image: String::new(),
            stock,
            rating,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_stock_status_buckets() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(6), StockStatus::InStock);
    }

    #[test]
    fn test_sort() {
        let a = product(1, 3000, 4.0, 3);
        let b = product(2, 1000, 4.8, 3);
        let c = product(3, 2000, 3.5, 3);

        let mut list = vec![&a, &b, &c];
        ProductSort::PriceAsc.apply(&mut list);
        assert_eq!(list.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(), [2, 3, 1]);

        ProductSort::Rating.apply(&mut list);
        assert_eq!(list.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(), [2, 1, 3]);

        assert_eq!(ProductSort::parse("bogus"), ProductSort::Featured);
    }

    #[test]
    fn test_on_sale() {
        let mut p = product(1, 1000, 4.0, 1);
        assert!(!p.on_sale());
        p.compare_at_price = Some(Price::from_cents(1500));
        assert!(p.on_sale());
    }
}
