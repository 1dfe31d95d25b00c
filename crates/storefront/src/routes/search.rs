//! Search route handlers.
//!
//! Searching records the query in the session search container; visiting
//! `/search` without a query shows the last one again.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use super::FilterOption;
use super::products::{ProductCardView, cards};
use crate::containers::{SearchContainer, WishlistContainer};
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::search::SearchSort;
use crate::state::AppState;

/// Maximum number of results on the search page.
const RESULT_LIMIT: usize = 48;

/// Search page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchPageQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub sort: String,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/show.html")]
pub struct SearchPageTemplate {
    pub page: PageContext,
    pub query: String,
    pub results: Vec<ProductCardView>,
    pub recent: Vec<String>,
    pub sorts: Vec<FilterOption>,
    pub sort: &'static str,
}

/// Full search page.
///
/// # Errors
///
/// Returns an error if the search index fails.
#[instrument(skip(state, page, history, wishlist))]
pub async fn search_page(
    State(state): State<AppState>,
    page: PageContext,
    mut history: SearchContainer,
    wishlist: WishlistContainer,
    Query(params): Query<SearchPageQuery>,
) -> Result<impl IntoResponse> {
    let query = match params.q {
        Some(q) => {
            history.record(&q).await;
            q.trim().to_string()
        }
        None => history.query.clone(),
    };
    let sort = SearchSort::parse(&params.sort);

    let hits = state.search().search(&query, sort, RESULT_LIMIT)?;
    let products = hits
        .iter()
        .filter_map(|hit| state.catalog().get(hit.product_id));
    tracing::debug!(hits = hits.len(), "Search complete");

    let sorts = [
        (SearchSort::Relevance, "Best match"),
        (SearchSort::PriceAsc, "Price: low to high"),
        (SearchSort::PriceDesc, "Price: high to low"),
    ]
    .into_iter()
    .map(|(option, label)| FilterOption::new(option.as_str(), label, option == sort))
    .collect();

    Ok(SearchPageTemplate {
        page,
        results: cards(products, &wishlist),
        recent: history.recent.clone(),
        sorts,
        sort: sort.as_str(),
        query,
    })
}

/// Forget recent searches.
#[instrument(skip(history))]
pub async fn clear_history(mut history: SearchContainer) -> Redirect {
    history.clear_recent().await;
    Redirect::to("/search")
}
