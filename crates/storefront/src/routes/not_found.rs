//! 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::filters;
use crate::middleware::PageContext;

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

/// Render the 404 page.
#[must_use]
pub fn render(page: PageContext) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { page }).into_response()
}

/// Router fallback for unknown paths.
pub async fn fallback(page: PageContext) -> Response {
    tracing::debug!(path = %page.path, "No route matched");
    render(page)
}
