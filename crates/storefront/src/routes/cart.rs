//! Cart route handlers.
//!
//! Mutations are plain form posts that write the cart container and redirect
//! back to the cart (or the page named in `next`).

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

use bazaar_core::{
    Cart, CartItem, Coupon, CouponError, Price, ProductId, ShippingMethod, shipping,
};

use super::coupons;
use crate::containers::{AppliedCoupon, CartContainer, CouponContainer};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, safe_redirect_target};
use crate::services::{OrderTotals, pricing};
use crate::state::{AppState, today};

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub title: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.as_i32(),
            title: item.title.clone(),
            image: item.image.clone(),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Applied coupon display data.
#[derive(Clone)]
pub struct CouponView {
    pub code: String,
    pub title: String,
    pub value_label: String,
    /// Set when the coupon gives nothing on this cart.
    pub notice: Option<String>,
}

/// Order totals display data.
#[derive(Clone)]
pub struct SummaryView {
    pub item_count: u32,
    pub subtotal: String,
    pub discount: Option<String>,
    pub shipping: String,
    pub total: String,
}

impl SummaryView {
    #[must_use]
    pub fn new(cart: &Cart, totals: &OrderTotals) -> Self {
        Self {
            item_count: cart.item_count(),
            subtotal: totals.subtotal.to_string(),
            discount: (!totals.discount.is_zero()).then(|| format!("-{}", totals.discount)),
            shipping: if totals.shipping.is_zero() {
                "Free".to_string()
            } else {
                totals.shipping.to_string()
            },
            total: totals.total.to_string(),
        }
    }
}

/// The applied coupon, resolved for display and pricing.
pub struct ResolvedCoupon {
    pub coupon: Option<Coupon>,
    pub view: Option<CouponView>,
    pub error: Option<String>,
}

/// Resolve the session's applied coupon against today's coupon list.
///
/// A coupon that stopped being usable stays applied but gives no discount;
/// the reason is returned for display.
#[must_use]
pub fn resolve_applied_coupon(
    state: &AppState,
    applied: &AppliedCoupon,
    subtotal: Price,
    today: NaiveDate,
) -> ResolvedCoupon {
    let Some(code) = applied.code() else {
        return ResolvedCoupon {
            coupon: None,
            view: None,
            error: None,
        };
    };

    match pricing::resolve_coupon(state.backend(), code, today) {
        Ok(coupon) => ResolvedCoupon {
            view: Some(CouponView {
                code: coupon.code.clone(),
                title: coupon.title.clone(),
                value_label: coupon.value_label(),
                notice: pricing::minimum_notice(&coupon, subtotal),
            }),
            coupon: Some(coupon),
            error: None,
        },
        Err(e) => ResolvedCoupon {
            coupon: None,
            view: None,
            error: Some(coupon_error_message(&e)),
        },
    }
}

/// Sentence-case message for a coupon problem.
#[must_use]
pub fn coupon_error_message(error: &CouponError) -> String {
    let message = error.to_string();
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
    pub next: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart page query parameters.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub coupon_error: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub lines: Vec<CartLineView>,
    pub summary: SummaryView,
    pub coupon: Option<CouponView>,
    pub coupon_error: Option<String>,
    pub free_shipping_note: Option<String>,
}

/// Display cart page.
#[instrument(skip(state, page, cart, applied))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    cart: CartContainer,
    applied: CouponContainer,
    Query(query): Query<CartQuery>,
) -> impl IntoResponse {
    let today = today();
    let resolved = resolve_applied_coupon(&state, &applied, cart.subtotal(), today);
    let totals = OrderTotals::compute(
        &cart,
        resolved.coupon.as_ref(),
        ShippingMethod::Standard,
        today,
    );

    let free_shipping_note = (!cart.is_empty()
        && totals.subtotal < shipping::FREE_SHIPPING_THRESHOLD)
        .then(|| {
            format!(
                "Add {} more for free standard shipping",
                shipping::FREE_SHIPPING_THRESHOLD.saturating_sub(totals.subtotal)
            )
        });

    CartShowTemplate {
        page,
        lines: cart.items.iter().map(CartLineView::from).collect(),
        summary: SummaryView::new(&cart, &totals),
        coupon: resolved.view,
        coupon_error: query
            .coupon_error
            .as_deref()
            .and_then(coupons::error_message)
            .map(str::to_string)
            .or(resolved.error),
        free_shipping_note,
    }
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns 404 for an unknown product and 400 when it is out of stock.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: CartContainer,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state
        .catalog()
        .get(ProductId::new(form.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;
    if !product.is_available() {
        return Err(AppError::BadRequest(format!("{} is out of stock", product.title)));
    }

    let quantity = form.quantity.unwrap_or(1).clamp(1, product.stock);
    cart.add(CartItem::from_product(product, quantity)).await;

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    Ok(Redirect::to(safe_redirect_target(
        form.next.as_deref().or(Some("/cart")),
    )))
}

/// Change a line's quantity (zero removes it).
#[instrument(skip(cart))]
pub async fn update(mut cart: CartContainer, Form(form): Form<UpdateCartForm>) -> Redirect {
    let product_id = ProductId::new(form.product_id);
    if !cart.set_quantity(product_id, form.quantity).await {
        tracing::debug!(%product_id, "Quantity update for a product not in the cart");
    }
    Redirect::to("/cart")
}

/// Remove a line.
#[instrument(skip(cart))]
pub async fn remove(mut cart: CartContainer, Form(form): Form<RemoveFromCartForm>) -> Redirect {
    cart.remove(ProductId::new(form.product_id)).await;
    Redirect::to("/cart")
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(mut cart: CartContainer) -> Redirect {
    cart.clear().await;
    Redirect::to("/cart")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_error_message() {
        let error = CouponError::Expired("SUMMER30".to_string());
        assert_eq!(coupon_error_message(&error), "Coupon SUMMER30 has expired");
    }

    #[test]
    fn test_summary_view() {
        let mut cart = Cart::default();
        cart.add(CartItem {
            product_id: ProductId::new(1),
            title: "Mug".to_string(),
            image: String::new(),
            unit_price: Price::from_cents(3000),
            quantity: 2,
        });
        let totals = OrderTotals {
            subtotal: Price::from_cents(6000),
            discount: Price::from_cents(600),
            shipping: Price::zero(),
            total: Price::from_cents(5400),
        };

        let summary = SummaryView::new(&cart, &totals);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.discount.as_deref(), Some("-$6.00"));
        assert_eq!(summary.shipping, "Free");
        assert_eq!(summary.total, "$54.00");
    }
}
