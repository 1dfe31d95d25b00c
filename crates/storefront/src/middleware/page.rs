//! Per-request layout context.
//!
//! Every full page renders the same header (user menu, cart and wishlist
//! badges, theme class) and needs the CSP nonce for inline scripts.
//! [`PageContext`] gathers all of it in one extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use bazaar_core::{Cart, Theme, User, Wishlist};

use super::CspNonce;
use crate::containers::{Storage, StorageRejection};
use crate::models::session_keys;

/// Layout data shared by all page templates.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub user: Option<User>,
    pub theme: Theme,
    pub cart_count: u32,
    pub wishlist_count: usize,
    pub nonce: String,
    pub path: String,
}

impl PageContext {
    /// CSS class for the `<html>` element.
    #[must_use]
    pub const fn theme_class(&self) -> &'static str {
        self.theme.as_str()
    }

    /// Whether a nav link should be highlighted.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.path == "/"
        } else {
            self.path.starts_with(prefix)
        }
    }

    /// Label for the account menu.
    #[must_use]
    pub fn greeting(&self) -> String {
        self.user
            .as_ref()
            .map_or_else(|| "Sign in".to_string(), |user| format!("Hi, {}", user.first_name()))
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = StorageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let storage = Storage::from_request_parts(parts, state).await?;
        let CspNonce(nonce) = parts
            .extensions
            .get::<CspNonce>()
            .cloned()
            .unwrap_or_else(|| CspNonce(String::new()));

        let user = storage
            .read::<Option<User>>(session_keys::USER)
            .await
            .flatten();
        let theme = storage
            .read::<Theme>(session_keys::THEME)
            .await
            .unwrap_or_default();
        let cart_count = storage
            .read::<Cart>(session_keys::CART)
            .await
            .map_or(0, |cart| cart.item_count());
        let wishlist_count = storage
            .read::<Wishlist>(session_keys::WISHLIST)
            .await
            .map_or(0, |wishlist| wishlist.len());

        Ok(Self {
            user,
            theme,
            cart_count,
            wishlist_count,
            nonce,
            path: parts.uri.path().to_string(),
        })
    }
}
