//! Delivery estimate page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{DeliveryEstimate, Price, ShippingError, ShippingMethod, shipping};

use crate::containers::CartContainer;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::today;

/// One shipping option for the entered ZIP.
#[derive(Clone)]
pub struct EstimateView {
    pub method: &'static str,
    pub window: String,
    pub business_days: String,
    pub cost: String,
}

impl From<&DeliveryEstimate> for EstimateView {
    fn from(estimate: &DeliveryEstimate) -> Self {
        let (min, max) = estimate.zone.transit_days(estimate.method);
        Self {
            method: estimate.method.label(),
            window: estimate.window(),
            business_days: format!("{min}-{max} business days"),
            cost: if estimate.cost.is_zero() {
                "Free".to_string()
            } else {
                estimate.cost.to_string()
            },
        }
    }
}

/// Shipping page query parameters.
#[derive(Debug, Deserialize)]
pub struct ShippingQuery {
    pub zip: Option<String>,
}

/// Shipping estimate page template.
#[derive(Template, WebTemplate)]
#[template(path = "shipping.html")]
pub struct ShippingTemplate {
    pub page: PageContext,
    pub zip: String,
    pub region: Option<&'static str>,
    pub estimates: Vec<EstimateView>,
    pub error: Option<String>,
    pub free_shipping_over: String,
}

/// Estimates for every shipping method, for the region of `zip`.
///
/// # Errors
///
/// Returns `ShippingError::InvalidZip` unless `zip` is five digits.
pub fn estimates_for(
    zip: &str,
    subtotal: Price,
    today: NaiveDate,
) -> Result<Vec<DeliveryEstimate>, ShippingError> {
    ShippingMethod::ALL
        .into_iter()
        .map(|method| DeliveryEstimate::for_zip(zip, method, subtotal, today))
        .collect()
}

/// Display the shipping estimate page.
#[instrument(skip(page, cart))]
pub async fn index(
    page: PageContext,
    cart: CartContainer,
    Query(query): Query<ShippingQuery>,
) -> impl IntoResponse {
    let zip = query.zip.unwrap_or_default().trim().to_string();
    let mut template = ShippingTemplate {
        page,
        zip: String::new(),
        region: None,
        estimates: Vec::new(),
        error: None,
        free_shipping_over: shipping::FREE_SHIPPING_THRESHOLD.to_string(),
    };

    if !zip.is_empty() {
        match estimates_for(&zip, cart.subtotal(), today()) {
            Ok(estimates) => {
                template.region = estimates.first().map(|e| e.zone.region);
                template.estimates = estimates.iter().map(EstimateView::from).collect();
            }
            Err(e) => template.error = Some(e.to_string()),
        }
    }
    template.zip = zip;

    template
}
