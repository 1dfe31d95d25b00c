//! Coupon listing and the applied-coupon toggle.
//!
//! Apply and remove are form posts that redirect back to `next` (the cart by
//! default). A rejected code comes back as a `coupon_error` query code so the
//! target page can explain it inline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{Coupon, CouponCategory, CouponError, CouponFilter, CouponSort};

use super::FilterOption;
use crate::containers::CouponContainer;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::{PageContext, safe_redirect_target};
use crate::services::pricing;
use crate::state::{AppState, today};

/// Coupon card display data.
#[derive(Clone)]
pub struct CouponCardView {
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub value_label: String,
    pub min_order: Option<String>,
    pub expiry: String,
    pub expired: bool,
    pub usable: bool,
    pub applied: bool,
}

impl CouponCardView {
    #[must_use]
    pub fn new(coupon: &Coupon, today: NaiveDate, applied: Option<&str>) -> Self {
        let expiry = match coupon.days_left(today) {
            None => format!("Expired {}", coupon.expires_on.format("%b %-d, %Y")),
            Some(0) => "Expires today".to_string(),
            Some(1) => "Expires tomorrow".to_string(),
            Some(days) if days <= 7 => format!("Expires in {days} days"),
            Some(_) => format!("Expires {}", coupon.expires_on.format("%b %-d, %Y")),
        };

        Self {
            code: coupon.code.clone(),
            title: coupon.title.clone(),
            description: coupon.description.clone(),
            category: coupon.category.label(),
            value_label: coupon.value_label(),
            min_order: coupon.min_order.map(|min| min.to_string()),
            expiry,
            expired: coupon.is_expired(today),
            usable: coupon.check_applicable(today).is_ok(),
            applied: applied.is_some_and(|code| code.eq_ignore_ascii_case(&coupon.code)),
        }
    }
}

/// Coupon listing query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CouponsQuery {
    pub q: String,
    pub category: String,
    /// Checkbox value; present means checked.
    pub show_expired: Option<String>,
    pub sort: String,
    pub coupon_error: Option<String>,
}

impl CouponsQuery {
    /// The filter described by these parameters.
    #[must_use]
    pub fn filter(&self) -> CouponFilter {
        CouponFilter {
            search: self.q.trim().to_string(),
            category: self.category.parse().ok(),
            show_expired: self.show_expired.is_some(),
        }
    }
}

/// Coupon listing template.
#[derive(Template, WebTemplate)]
#[template(path = "coupons.html")]
pub struct CouponsTemplate {
    pub page: PageContext,
    pub coupons: Vec<CouponCardView>,
    pub total: usize,
    pub q: String,
    pub categories: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub show_expired: bool,
    pub applied: Option<String>,
    pub error: Option<&'static str>,
}

/// Apply or remove form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
    pub next: Option<String>,
}

/// Query code for a rejected coupon.
#[must_use]
pub const fn error_code(error: &CouponError) -> &'static str {
    match error {
        CouponError::UnknownCode(_) => "unknown",
        CouponError::Expired(_) => "expired",
        CouponError::Inactive(_) => "inactive",
        CouponError::Exhausted(_) => "exhausted",
    }
}

/// Message for a `coupon_error` query code.
#[must_use]
pub fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "unknown" => Some("That coupon code doesn't exist."),
        "expired" => Some("That coupon has expired."),
        "inactive" => Some("That coupon is not currently active."),
        "exhausted" => Some("That coupon has reached its usage limit."),
        "empty" => Some("Please enter a coupon code."),
        _ => None,
    }
}

fn category_options(selected: Option<CouponCategory>) -> Vec<FilterOption> {
    std::iter::once(FilterOption::new("", "All categories", selected.is_none()))
        .chain(CouponCategory::ALL.into_iter().map(|category| {
            FilterOption::new(category.as_str(), category.label(), selected == Some(category))
        }))
        .collect()
}

fn sort_options(selected: CouponSort) -> Vec<FilterOption> {
    [
        (CouponSort::Expiring, "Expiring soonest"),
        (CouponSort::Value, "Biggest value"),
        (CouponSort::Code, "Code (A-Z)"),
    ]
    .into_iter()
    .map(|(sort, label)| FilterOption::new(sort.as_str(), label, sort == selected))
    .collect()
}

/// Append a query parameter to a local path.
fn with_param(target: &str, key: &str, value: &str) -> String {
    let separator = if target.contains('?') { '&' } else { '?' };
    format!("{target}{separator}{key}={}", urlencoding::encode(value))
}

/// Display the coupon listing.
#[instrument(skip(state, page, applied))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    applied: CouponContainer,
    Query(query): Query<CouponsQuery>,
) -> impl IntoResponse {
    let today = today();
    let all = state.backend().list_coupons(today).await;

    let filter = query.filter();
    let sort = CouponSort::parse(&query.sort);
    let mut visible = filter.apply(&all, today);
    sort.apply(&mut visible);

    let applied_code = applied.code();
    let coupons = visible
        .into_iter()
        .map(|coupon| CouponCardView::new(coupon, today, applied_code))
        .collect();

    CouponsTemplate {
        page,
        coupons,
        total: all.len(),
        categories: category_options(filter.category),
        sorts: sort_options(sort),
        show_expired: filter.show_expired,
        applied: applied_code.map(str::to_string),
        error: query.coupon_error.as_deref().and_then(error_message),
        q: filter.search,
    }
}

/// Apply a coupon code.
#[instrument(skip(state, applied), fields(code = %form.code))]
pub async fn apply(
    State(state): State<AppState>,
    mut applied: CouponContainer,
    Form(form): Form<CouponForm>,
) -> Redirect {
    let target = safe_redirect_target(form.next.as_deref().or(Some("/cart")));
    let code = form.code.trim();
    if code.is_empty() {
        return Redirect::to(&with_param(target, "coupon_error", "empty"));
    }

    match pricing::resolve_coupon(state.backend(), code, today()) {
        Ok(coupon) => {
            applied.apply(&coupon.code).await;
            add_breadcrumb("coupon", "Coupon applied", Some(&[("code", coupon.code.as_str())]));
            Redirect::to(target)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Coupon rejected");
            Redirect::to(&with_param(target, "coupon_error", error_code(&e)))
        }
    }
}

/// Remove the applied coupon.
#[instrument(skip(applied))]
pub async fn remove(mut applied: CouponContainer, Form(form): Form<CouponForm>) -> Redirect {
    applied.remove().await;
    Redirect::to(safe_redirect_target(form.next.as_deref().or(Some("/cart"))))
}
