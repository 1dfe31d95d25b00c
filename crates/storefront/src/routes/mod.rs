//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About page
//! GET  /contact                - Contact form
//! POST /contact                - Send a contact message
//! POST /theme                  - Toggle light/dark theme
//!
//! # Products
//! GET  /products               - Product listing (category filter, sort)
//! GET  /product/{id}           - Product detail
//! GET  /search                 - Product search
//! POST /search/clear           - Forget recent searches
//! GET  /inventory              - Stock levels
//!
//! # Cart and checkout
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Change a quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /coupons                - Coupon listing (filter, sort)
//! POST /coupons/apply          - Apply a coupon code
//! POST /coupons/remove         - Remove the applied coupon
//! GET  /shipping               - Delivery estimate by ZIP
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place the order
//!
//! # Auth (POSTs rate limited)
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//! GET  /register               - Register page
//! POST /register               - Register action
//! GET  /verify-email           - Verification code entry
//! POST /verify-email           - Check the code
//! POST /verify-email/resend    - Send a new code
//! GET  /forgot-password        - Password reset request
//! POST /forgot-password        - Request a reset code
//! POST /forgot-password/reset  - Set a new password
//!
//! # Account (requires login)
//! GET  /profile                - Profile and addresses
//! POST /profile                - Update profile
//! POST /profile/addresses      - Add an address
//! GET  /orders                 - Order history (status tabs)
//! POST /orders/{id}/cancel     - Cancel a pending order locally
//!
//! # Wishlist
//! GET  /wishlist               - Saved products
//! POST /wishlist/toggle        - Save or unsave a product
//! POST /wishlist/remove        - Unsave a product
//! POST /wishlist/move-to-cart  - Move a saved product to the cart
//!
//! *                            - 404 page
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod coupons;
pub mod home;
pub mod inventory;
pub mod not_found;
pub mod orders;
pub mod pages;
pub mod products;
pub mod search;
pub mod shipping;
pub mod theme;
pub mod verification;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// One choice in a filter, sort or select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Create the auth form pages router.
pub fn auth_pages() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/verify-email", get(verification::show))
        .route("/forgot-password", get(auth::forgot_password_page))
}

/// Create the auth actions router, rate limited per client IP when enabled.
pub fn auth_actions(rate_limit: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/verify-email", post(verification::verify))
        .route("/verify-email/resend", post(verification::resend))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/forgot-password/reset", post(auth::reset_password));

    if rate_limit {
        router.layer(auth_rate_limiter())
    } else {
        router
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the coupon routes router.
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::index))
        .route("/apply", post(coupons::apply))
        .route("/remove", post(coupons::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::show).post(account::update))
        .route("/profile/addresses", post(account::add_address))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/cancel", post(orders::cancel))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/contact", get(contact::show).post(contact::submit))
        .route("/theme", post(theme::toggle))
        // Catalog
        .route("/products", get(products::index))
        .route("/product/{id}", get(products::show))
        .route("/search", get(search::search_page))
        .route("/search/clear", post(search::clear_history))
        .route("/inventory", get(inventory::index))
        // Cart and checkout
        .nest("/cart", cart_routes())
        .nest("/coupons", coupon_routes())
        .route("/shipping", get(shipping::index))
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        // Auth
        .merge(auth_pages())
        .merge(auth_actions(config.rate_limit_enabled))
        .route("/logout", post(auth::logout))
        // Account
        .merge(account_routes())
        .nest("/wishlist", wishlist_routes())
        .fallback(not_found::fallback)
}
