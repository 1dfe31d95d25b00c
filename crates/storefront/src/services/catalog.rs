//! In-memory product catalog.

use bazaar_core::{Price, Product, ProductCategory, ProductId, ProductSort, StockStatus};

const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Stock totals for the inventory page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StockSummary {
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_units: u32,
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a product list (catalog order is "featured" order).
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The demo catalog served by the storefront.
    #[must_use]
    pub fn demo() -> Self {
        use ProductCategory::{Books, Clothing, Electronics, Home, Sports};

        Self::new(vec![
            product(1, "Wireless Headphones", Electronics, 12999, Some(15999), 24, 4.6,
                "Over-ear headphones with active noise cancelling and 30-hour battery life.",
                &["audio", "bluetooth", "wireless"]),
            product(2, "Smart Watch", Electronics, 19900, None, 4, 4.3,
                "Track workouts, sleep and notifications from a bright always-on display.",
                &["wearable", "fitness", "bluetooth"]),
            product(3, "Portable Charger", Electronics, 3999, None, 0, 4.1,
                "10,000 mAh power bank with USB-C fast charging for phones and tablets.",
                &["battery", "usb", "travel"]),
            product(4, "Bluetooth Speaker", Electronics, 5999, None, 12, 4.4,
                "Waterproof speaker with rich bass, ready for the beach or the backyard.",
                &["audio", "bluetooth", "outdoor"]),
            product(5, "Organic Cotton T-Shirt", Clothing, 2400, None, 80, 4.2,
                "Soft everyday tee made from certified organic cotton.",
                &["shirt", "cotton", "basics"]),
            product(6, "Denim Jacket", Clothing, 8950, Some(11000), 3, 4.5,
                "Classic fit jacket in washed denim with brass buttons.",
                &["jacket", "denim", "outerwear"]),
            product(7, "Wool Beanie", Clothing, 1800, None, 40, 4.0,
                "Ribbed merino wool beanie that keeps you warm without itching.",
                &["hat", "wool", "winter"]),
            product(8, "Ceramic Coffee Mug", Home, 1499, None, 60, 4.7,
                "Hand-glazed stoneware mug that holds a generous 14 ounces.",
                &["kitchen", "coffee", "ceramic"]),
            product(9, "Linen Throw Pillow", Home, 3400, None, 0, 3.9,
                "Stonewashed linen cover with a plush recycled-fiber insert.",
                &["decor", "linen", "living room"]),
            product(10, "Scented Soy Candle", Home, 2200, None, 5, 4.8,
                "Cedar and vanilla soy candle with a 50-hour burn time.",
                &["decor", "candle", "gift"]),
            product(11, "The Rust Programming Handbook", Books, 4495, None, 15, 4.9,
                "A practical guide to ownership, traits and fearless concurrency.",
                &["programming", "rust", "reference"]),
            product(12, "Mystery at Harbor Point", Books, 1699, None, 2, 4.2,
                "A coastal whodunit full of storms, secrets and a stubborn detective.",
                &["fiction", "mystery", "paperback"]),
            product(13, "Everyday Vegetarian Cookbook", Books, 2999, None, 9, 4.5,
                "One hundred weeknight recipes built around seasonal vegetables.",
                &["cooking", "recipes", "kitchen"]),
            product(14, "Yoga Mat", Sports, 4500, Some(5500), 18, 4.6,
                "Non-slip natural rubber mat with alignment lines.",
                &["yoga", "fitness", "mat"]),
            product(15, "Stainless Water Bottle", Sports, 2750, None, 33, 4.4,
                "Insulated bottle that keeps drinks cold for 24 hours.",
                &["hydration", "outdoor", "travel"]),
            product(16, "Trail Running Shoes", Sports, 11900, None, 1, 4.3,
                "Grippy, cushioned shoes for rocky trails and muddy mornings.",
                &["running", "shoes", "outdoor"]),
        ])
    }

    /// Every product in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products in a category (or all), sorted.
    #[must_use]
    pub fn list(&self, category: Option<ProductCategory>, sort: ProductSort) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| category.is_none_or(|c| product.category == c))
            .collect();
        sort.apply(&mut products);
        products
    }

    /// Best-rated available products.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| product.is_available())
            .collect();
        ProductSort::Rating.apply(&mut products);
        products.truncate(limit);
        products
    }

    /// Other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(limit)
            .collect()
    }

    /// Products filtered by stock status.
    #[must_use]
    pub fn inventory(&self, status: Option<StockStatus>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| status.is_none_or(|s| product.stock_status() == s))
            .collect()
    }

    /// Stock totals across the whole catalog.
    #[must_use]
    pub fn stock_summary(&self) -> StockSummary {
        self.products
            .iter()
            .fold(StockSummary::default(), |mut summary, product| {
                match product.stock_status() {
                    StockStatus::InStock => summary.in_stock += 1,
                    StockStatus::LowStock => summary.low_stock += 1,
                    StockStatus::OutOfStock => summary.out_of_stock += 1,
                }
                summary.total_units += product.stock;
                summary
            })
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: i32,
    title: &str,
    category: ProductCategory,
    cents: i64,
    compare_at_cents: Option<i64>,
    stock: u32,
    rating: f32,
    description: &str,
    tags: &[&str],
) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        category,
        price: Price::from_cents(cents),
        compare_at_price: compare_at_cents.map(Price::from_cents),
        image: PLACEHOLDER_IMAGE.to_string(),
        stock,
        rating,
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_ids_are_unique() {
        let catalog = Catalog::demo();
        let mut ids: Vec<i32> = catalog.all().iter().map(|p| p.id.as_i32()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.all().len());
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let catalog = Catalog::demo();
        let books = catalog.list(Some(ProductCategory::Books), ProductSort::PriceAsc);
        assert_eq!(books.len(), 3);
        assert!(books.iter().all(|p| p.category == ProductCategory::Books));
        assert!(books.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_featured_skips_unavailable() {
        let catalog = Catalog::demo();
        let featured = catalog.featured(4);
        assert_eq!(featured.len(), 4);
        assert!(featured.iter().all(|p| p.is_available()));
        assert_eq!(featured[0].title, "The Rust Programming Handbook");
    }

    #[test]
    fn test_related_excludes_self() {
        let catalog = Catalog::demo();
        let mug = catalog.get(ProductId::new(8)).unwrap();
        let related = catalog.related(mug, 4);
        assert!(!related.is_empty());
        assert!(related.iter().all(|p| p.id != mug.id && p.category == mug.category));
    }

    #[test]
    fn test_stock_summary() {
        let catalog = Catalog::demo();
        let summary = catalog.stock_summary();
        assert_eq!(
            summary.in_stock + summary.low_stock + summary.out_of_stock,
            catalog.all().len()
        );
        assert_eq!(summary.out_of_stock, 2);
        assert_eq!(
            catalog.inventory(Some(StockStatus::LowStock)).len(),
            summary.low_stock
        );
    }
}
