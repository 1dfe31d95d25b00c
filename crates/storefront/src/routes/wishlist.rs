//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{ProductId, WishlistItem};

use crate::containers::{CartContainer, WishlistContainer};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, safe_redirect_target};
use crate::state::AppState;

/// Wishlist entry display data.
#[derive(Clone)]
pub struct WishlistItemView {
    pub product_id: i32,
    pub title: String,
    pub image: String,
    pub price: String,
    pub available: bool,
}

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: i32,
    pub next: Option<String>,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistTemplate {
    pub page: PageContext,
    pub items: Vec<WishlistItemView>,
}

/// Display the wishlist.
#[instrument(skip(state, page, wishlist))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    wishlist: WishlistContainer,
) -> impl IntoResponse {
    let items = wishlist
        .items
        .iter()
        .map(|item| WishlistItemView {
            product_id: item.product_id.as_i32(),
            title: item.title.clone(),
            image: item.image.clone(),
            price: item.price.to_string(),
            available: state
                .catalog()
                .get(item.product_id)
                .is_some_and(bazaar_core::Product::is_available),
        })
        .collect();

    WishlistTemplate { page, items }
}

/// Save or unsave a product.
///
/// # Errors
///
/// Returns 404 for an unknown product.
#[instrument(skip(state, wishlist))]
pub async fn toggle(
    State(state): State<AppState>,
    mut wishlist: WishlistContainer,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let product = state
        .catalog()
        .get(ProductId::new(form.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let saved = wishlist.toggle(WishlistItem::from_product(product)).await;
    tracing::debug!(product_id = %product.id, saved, "Wishlist toggled");

    Ok(Redirect::to(safe_redirect_target(
        form.next.as_deref().or(Some("/wishlist")),
    )))
}

/// Remove a saved product.
#[instrument(skip(wishlist))]
pub async fn remove(mut wishlist: WishlistContainer, Form(form): Form<WishlistForm>) -> Redirect {
    wishlist.remove(ProductId::new(form.product_id)).await;
    Redirect::to("/wishlist")
}

/// Move a saved product into the cart.
#[instrument(skip(state, wishlist, cart))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    mut wishlist: WishlistContainer,
    mut cart: CartContainer,
    Form(form): Form<WishlistForm>,
) -> Redirect {
    let product_id = ProductId::new(form.product_id);
    let available = state
        .catalog()
        .get(product_id)
        .is_some_and(bazaar_core::Product::is_available);
    if !available {
        tracing::debug!(%product_id, "Refusing to move an unavailable product to the cart");
        return Redirect::to("/wishlist");
    }

    if wishlist.move_to_cart(product_id, &mut cart).await {
        Redirect::to("/cart")
    } else {
        Redirect::to("/wishlist")
    }
}
