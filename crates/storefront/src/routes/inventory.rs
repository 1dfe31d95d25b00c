//! Inventory page: stock levels across the catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{Product, StockStatus};

use super::FilterOption;
use crate::filters;
use crate::middleware::PageContext;
use crate::services::StockSummary;
use crate::state::AppState;

/// Inventory row display data.
#[derive(Clone)]
pub struct InventoryRow {
    pub id: i32,
    pub title: String,
    pub category: &'static str,
    pub price: String,
    pub stock: u32,
    pub status_label: &'static str,
    pub status_class: &'static str,
}

impl From<&Product> for InventoryRow {
    fn from(product: &Product) -> Self {
        let status = product.stock_status();
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            category: product.category.label(),
            price: product.price.to_string(),
            stock: product.stock,
            status_label: status.label(),
            status_class: status.as_str(),
        }
    }
}

/// Inventory query parameters.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub status: Option<String>,
}

/// Inventory page template.
#[derive(Template, WebTemplate)]
#[template(path = "inventory.html")]
pub struct InventoryTemplate {
    pub page: PageContext,
    pub rows: Vec<InventoryRow>,
    pub statuses: Vec<FilterOption>,
    pub summary: StockSummary,
}

/// Status filter options, "All" first.
fn status_options(selected: Option<StockStatus>) -> Vec<FilterOption> {
    let statuses = [
        StockStatus::InStock,
        StockStatus::LowStock,
        StockStatus::OutOfStock,
    ];
    std::iter::once(FilterOption::new("", "All", selected.is_none()))
        .chain(statuses.into_iter().map(|status| {
            FilterOption::new(status.as_str(), status.label(), selected == Some(status))
        }))
        .collect()
}

/// Display the inventory page.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<InventoryQuery>,
) -> impl IntoResponse {
    // Unknown values show everything.
    let status = query.status.as_deref().and_then(|s| s.parse().ok());
    let rows = state
        .catalog()
        .inventory(status)
        .into_iter()
        .map(InventoryRow::from)
        .collect();

    InventoryTemplate {
        page,
        rows,
        statuses: status_options(status),
        summary: state.catalog().stock_summary(),
    }
}
