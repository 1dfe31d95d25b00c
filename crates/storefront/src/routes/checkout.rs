//! Checkout route handlers.
//!
//! Checkout collects a shipping address and method, prices the cart with the
//! applied coupon and places a mock order. Signed-in customers see the order
//! in their history; guests only get the confirmation number.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{
    Address, Cart, DeliveryEstimate, Email, ShippingAddress, ShippingMethod, ShippingZone,
};

use super::FilterOption;
use super::cart::{CartLineView, CouponView, SummaryView, resolve_applied_coupon};
use crate::containers::{CartContainer, CouponContainer};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::PageContext;
use crate::services::{OrderRequest, OrderTotals};
use crate::state::{AppState, today};

/// Checkout form data (also used to refill the form after an error).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub shipping_method: String,
}

impl CheckoutForm {
    /// Prefill from a saved address.
    fn from_address(address: &Address, email: &Email) -> Self {
        Self {
            email: email.to_string(),
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            address1: address.address1.clone(),
            address2: address.address2.clone().unwrap_or_default(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
            country: address.country.clone(),
            shipping_method: ShippingMethod::Standard.as_str().to_string(),
        }
    }

    /// Names of required fields left blank.
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("email", &self.email),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("address", &self.address1),
            ("city", &self.city),
            ("state", &self.state),
            ("ZIP code", &self.zip),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn method(&self) -> ShippingMethod {
        self.shipping_method.parse().unwrap_or_default()
    }

    fn shipping_address(&self) -> ShippingAddress {
        let address2 = self.address2.trim();
        ShippingAddress {
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            address1: self.address1.trim().to_string(),
            address2: (!address2.is_empty()).then(|| address2.to_string()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub form: CheckoutForm,
    pub methods: Vec<FilterOption>,
    pub lines: Vec<CartLineView>,
    pub summary: SummaryView,
    pub coupon: Option<CouponView>,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub page: PageContext,
    pub order_number: String,
    pub email: String,
    pub total: String,
    pub item_count: u32,
    pub method: &'static str,
    pub delivery_window: Option<String>,
    pub region: &'static str,
    pub is_guest: bool,
}

/// Shipping method options with their cost for this subtotal.
fn method_options(cart: &Cart, selected: ShippingMethod) -> Vec<FilterOption> {
    ShippingMethod::ALL
        .into_iter()
        .map(|method| {
            let cost = method.cost(cart.subtotal());
            let label = if cost.is_zero() {
                format!("{} (free)", method.label())
            } else {
                format!("{} ({cost})", method.label())
            };
            FilterOption::new(method.as_str(), label, method == selected)
        })
        .collect()
}

/// Render the checkout page for the current cart.
fn render_checkout(
    state: &AppState,
    page: PageContext,
    cart: &Cart,
    applied: &CouponContainer,
    form: CheckoutForm,
    error: Option<String>,
) -> CheckoutTemplate {
    let today = today();
    let method = form.method();
    let resolved = resolve_applied_coupon(state, applied, cart.subtotal(), today);
    let totals = OrderTotals::compute(cart, resolved.coupon.as_ref(), method, today);

    CheckoutTemplate {
        page,
        methods: method_options(cart, method),
        lines: cart.items.iter().map(CartLineView::from).collect(),
        summary: SummaryView::new(cart, &totals),
        coupon: resolved.view,
        error: error.or(resolved.error),
        form,
    }
}

/// Display the checkout page.
///
/// # Errors
///
/// Returns an error if saved addresses cannot be fetched.
#[instrument(skip(state, page, cart, applied))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    cart: CartContainer,
    applied: CouponContainer,
) -> Result<Response> {
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let form = match &page.user {
        Some(user) => {
            let addresses = state.backend().fetch_user_addresses(user.id).await?;
            addresses.first().map_or_else(
                || CheckoutForm {
                    email: user.email.to_string(),
                    ..CheckoutForm::default()
                },
                |address| CheckoutForm::from_address(address, &user.email),
            )
        }
        None => CheckoutForm::default(),
    };

    Ok(render_checkout(&state, page, &cart, &applied, form, None).into_response())
}

/// Place the order.
///
/// # Errors
///
/// Returns an error if the backend rejects the order.
#[instrument(skip(state, page, cart, applied, form))]
pub async fn place_order(
    State(state): State<AppState>,
    mut page: PageContext,
    mut cart: CartContainer,
    mut applied: CouponContainer,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let missing = form.missing_fields();
    if !missing.is_empty() {
        let error = format!("Please fill in: {}", missing.join(", "));
        return Ok(render_checkout(&state, page, &cart, &applied, form, Some(error)).into_response());
    }
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            let error = e.to_string();
            return Ok(render_checkout(&state, page, &cart, &applied, form, Some(error)).into_response());
        }
    };
    let zone = match ShippingZone::for_zip(&form.zip) {
        Ok(zone) => zone,
        Err(e) => {
            let error = e.to_string();
            return Ok(render_checkout(&state, page, &cart, &applied, form, Some(error)).into_response());
        }
    };

    let today = today();
    let method = form.method();
    let resolved = resolve_applied_coupon(&state, &applied, cart.subtotal(), today);
    let totals = OrderTotals::compute(&cart, resolved.coupon.as_ref(), method, today);
    let estimate = DeliveryEstimate::for_zip(&form.zip, method, totals.subtotal, today).ok();

    let user_id = page.user.as_ref().map(|user| user.id);
    let order = state
        .backend()
        .place_order(
            user_id,
            &cart,
            OrderRequest {
                shipping_address: form.shipping_address(),
                total: totals.total,
                placed_on: today,
            },
        )
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.order_number.as_str())]),
    );

    cart.clear().await;
    applied.remove().await;
    page.cart_count = 0;

    Ok(ConfirmationTemplate {
        page,
        order_number: order.order_number.clone(),
        email: email.to_string(),
        total: order.total.to_string(),
        item_count: order.item_count(),
        method: method.label(),
        delivery_window: estimate.as_ref().map(DeliveryEstimate::window),
        region: zone.region,
        is_guest: user_id.is_none(),
    }
    .into_response())
}
