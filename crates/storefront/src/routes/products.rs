//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{
    Product, ProductCategory, ProductId, ProductSort, StockStatus, Wishlist, shipping,
};

use super::{FilterOption, not_found};
use crate::containers::WishlistContainer;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Number of related products on the detail page.
const RELATED_LIMIT: usize = 4;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub category: &'static str,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub rating: f32,
    pub stock_label: &'static str,
    pub stock_class: &'static str,
    pub available: bool,
    pub saved: bool,
}

impl ProductCardView {
    /// Build a card, marking it saved if it is on the wishlist.
    #[must_use]
    pub fn new(product: &Product, wishlist: &Wishlist) -> Self {
        let status = product.stock_status();
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.label(),
            price: product.price.to_string(),
            compare_at_price: product
                .on_sale()
                .then(|| product.compare_at_price.map(|p| p.to_string()))
                .flatten(),
            rating: product.rating,
            stock_label: status.label(),
            stock_class: status.as_str(),
            available: status != StockStatus::OutOfStock,
            saved: wishlist.contains(product.id),
        }
    }
}

/// Build cards for a product list.
pub fn cards<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    wishlist: &Wishlist,
) -> Vec<ProductCardView> {
    products
        .into_iter()
        .map(|product| ProductCardView::new(product, wishlist))
        .collect()
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub heading: String,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub category: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductCardView,
    pub description: String,
    pub tags: Vec<String>,
    pub stock: u32,
    pub max_quantity: u32,
    pub free_shipping_over: String,
    pub related_products: Vec<ProductCardView>,
}

/// Display product listing page.
#[instrument(skip(state, page, wishlist))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    wishlist: WishlistContainer,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let category = query
        .category
        .as_deref()
        .and_then(|value| value.parse::<ProductCategory>().ok());
    let sort = query.sort.as_deref().map(ProductSort::parse).unwrap_or_default();
    let products = state.catalog().list(category, sort);

    let mut categories = vec![FilterOption::new("", "All", category.is_none())];
    categories.extend(ProductCategory::ALL.into_iter().map(|c| {
        FilterOption::new(c.as_str(), c.label(), category == Some(c))
    }));

    let sorts = [
        (ProductSort::Featured, "Featured"),
        (ProductSort::PriceAsc, "Price: low to high"),
        (ProductSort::PriceDesc, "Price: high to low"),
        (ProductSort::Rating, "Top rated"),
    ]
    .into_iter()
    .map(|(option, label)| FilterOption::new(option.as_str(), label, option == sort))
    .collect();

    ProductsIndexTemplate {
        page,
        heading: category.map_or("All products", ProductCategory::label).to_string(),
        products: cards(products, &wishlist),
        categories,
        sorts,
        category: category.map(ProductCategory::as_str).unwrap_or_default().to_string(),
    }
}

/// Display product detail page.
#[instrument(skip(state, page, wishlist))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    wishlist: WishlistContainer,
    Path(id): Path<String>,
) -> Response {
    let Some(product) = id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| state.catalog().get(id))
    else {
        return not_found::render(page);
    };

    let related = state.catalog().related(product, RELATED_LIMIT);

    ProductShowTemplate {
        page,
        product: ProductCardView::new(product, &wishlist),
        description: product.description.clone(),
        tags: product.tags.clone(),
        stock: product.stock,
        max_quantity: product.stock.min(bazaar_core::MAX_LINE_QUANTITY),
        free_shipping_over: shipping::FREE_SHIPPING_THRESHOLD.to_string(),
        related_products: cards(related, &wishlist),
    }
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::WishlistItem;

    use super::*;
    use crate::services::Catalog;

    #[test]
    fn test_card_marks_sale_and_saved() {
        let catalog = Catalog::demo();
        let headphones = catalog.get(ProductId::new(1)).unwrap();
        let mut wishlist = Wishlist::default();

        let card = ProductCardView::new(headphones, &wishlist);
        assert_eq!(card.price, "$129.99");
        assert_eq!(card.compare_at_price.as_deref(), Some("$159.99"));
        assert!(!card.saved);

        wishlist.toggle(WishlistItem::from_product(headphones));
        assert!(ProductCardView::new(headphones, &wishlist).saved);
    }

    #[test]
    fn test_out_of_stock_card() {
        let catalog = Catalog::demo();
        let charger = catalog.get(ProductId::new(3)).unwrap();
        let card = ProductCardView::new(charger, &Wishlist::default());
        assert!(!card.available);
        assert_eq!(card.stock_class, "out_of_stock");
    }
}
