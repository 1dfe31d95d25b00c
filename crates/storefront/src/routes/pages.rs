//! Static marketing pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use bazaar_core::{ProductCategory, shipping};

use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
    pub product_count: usize,
    pub category_count: usize,
    pub free_shipping_over: String,
}

/// Display the about page.
#[instrument(skip(state, page))]
pub async fn about(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    AboutTemplate {
        page,
        product_count: state.catalog().all().len(),
        category_count: ProductCategory::ALL.len(),
        free_shipping_over: shipping::FREE_SHIPPING_THRESHOLD.to_string(),
    }
}
