//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use bazaar_core::{ProductCategory, shipping};

use super::products::{ProductCardView, cards};
use crate::containers::WishlistContainer;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Number of featured products on the home page.
const FEATURED_LIMIT: usize = 8;

/// Category tile display data.
#[derive(Clone)]
pub struct CategoryTile {
    pub value: &'static str,
    pub label: &'static str,
    pub count: usize,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub featured: Vec<ProductCardView>,
    pub categories: Vec<CategoryTile>,
    pub free_shipping_over: String,
}

/// Display the home page.
#[instrument(skip(state, page, wishlist))]
pub async fn home(
    State(state): State<AppState>,
    page: PageContext,
    wishlist: WishlistContainer,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let categories = ProductCategory::ALL
        .into_iter()
        .map(|category| CategoryTile {
            value: category.as_str(),
            label: category.label(),
            count: catalog.list(Some(category), bazaar_core::ProductSort::Featured).len(),
        })
        .collect();

    HomeTemplate {
        page,
        featured: cards(catalog.featured(FEATURED_LIMIT), &wishlist),
        categories,
        free_shipping_over: shipping::FREE_SHIPPING_THRESHOLD.to_string(),
    }
}
