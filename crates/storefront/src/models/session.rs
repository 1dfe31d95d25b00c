//! Session storage keys.
//!
//! The session store plays the role of the browser's local storage: each key
//! holds one JSON value that is replaced as a whole on every write.

/// Session keys for container state.
pub mod keys {
    /// Logged-in user record.
    pub const USER: &str = "user";

    /// Cart contents.
    pub const CART: &str = "cart";

    /// Saved products.
    pub const WISHLIST: &str = "wishlist";

    /// Current and recent search queries.
    pub const SEARCH: &str = "search";

    /// Light or dark theme.
    pub const THEME: &str = "theme";

    /// Orders the visitor cancelled locally.
    pub const CANCELLED_ORDERS: &str = "cancelled_orders";

    /// Coupon code applied to the cart.
    pub const APPLIED_COUPON: &str = "applied_coupon";

    /// Email awaiting verification and the resend countdown.
    pub const PENDING_VERIFICATION: &str = "pending_verification";
}
