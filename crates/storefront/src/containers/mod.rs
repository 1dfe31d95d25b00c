//! Session-backed state containers.
//!
//! Each container owns one concern (user, cart, wishlist, search, theme,
//! cancelled orders, applied coupon, pending verification) and is stored as a
//! single JSON value under its own session key. Handlers take a container as
//! an extractor, read its state, and call mutators that write the whole value
//! back.
//!
//! Storage failures are logged and swallowed: the in-memory value handed to
//! the handler stays as mutated even if the write did not land.

pub mod cart;
pub mod coupon;
pub mod orders;
pub mod search;
pub mod session;
pub mod theme;
pub mod verification;
pub mod wishlist;

use std::ops::Deref;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

pub use cart::CartContainer;
pub use coupon::{AppliedCoupon, CouponContainer};
pub use orders::{CancelledOrders, OrdersContainer};
pub use search::{SearchContainer, SearchHistory};
pub use session::SessionContainer;
pub use theme::ThemeContainer;
pub use verification::{PendingVerification, VerificationContainer};
pub use wishlist::WishlistContainer;

/// A value stored under a fixed session key.
pub trait Persisted: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Session key holding the value.
    const KEY: &'static str;
}

/// Rejection when the session layer is missing from the router.
#[derive(Debug)]
pub struct StorageRejection;

impl IntoResponse for StorageRejection {
    fn into_response(self) -> Response {
        tracing::error!("Session not found in request extensions - session layer missing");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Key-value access to the visitor's session.
#[derive(Clone, Debug)]
pub struct Storage {
    session: Session,
}

impl Storage {
    /// Wrap a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Read and deserialize a value; missing or unreadable values are `None`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.session.get::<T>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read session value");
                None
            }
        }
    }

    /// Serialize and store a value, replacing any previous value.
    pub async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.session.insert(key, value).await {
            tracing::error!(key, error = %e, "Failed to write session value");
        }
    }

    /// Delete a value.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.session.remove::<serde_json::Value>(key).await {
            tracing::error!(key, error = %e, "Failed to remove session value");
        }
    }

    /// Issue a new session ID, keeping the data (on login).
    pub async fn renew(&self) {
        if let Err(e) = self.session.cycle_id().await {
            tracing::error!(error = %e, "Failed to cycle session id");
        }
    }
}

impl<S> FromRequestParts<S> for Storage
where
    S: Send + Sync,
{
    type Rejection = StorageRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self::new)
            .ok_or(StorageRejection)
    }
}

/// A persisted value loaded for the current request.
///
/// Dereferences to the value for reads; mutators write the whole value back.
pub struct Container<T> {
    storage: Storage,
    value: T,
}

impl<T: Persisted> Container<T> {
    /// Load the value from storage, falling back to the default.
    pub async fn load(storage: Storage) -> Self {
        let value = storage.read(T::KEY).await.unwrap_or_default();
        Self { storage, value }
    }

    /// The current value.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Take the current value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Mutate the value and write it back.
    pub async fn update<F, R>(&mut self, mutate: F) -> R
    where
        F: FnOnce(&mut T) -> R + Send,
        R: Send,
    {
        let result = mutate(&mut self.value);
        self.storage.write(T::KEY, &self.value).await;
        result
    }

    /// Replace the value and write it back.
    pub async fn replace(&mut self, value: T) {
        self.value = value;
        self.storage.write(T::KEY, &self.value).await;
    }

    /// Reset to the default and delete the stored value.
    pub async fn reset(&mut self) {
        self.value = T::default();
        self.storage.remove(T::KEY).await;
    }
}

impl<T> Deref for Container<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<S, T> FromRequestParts<S> for Container<T>
where
    S: Send + Sync,
    T: Persisted,
{
    type Rejection = StorageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let storage = Storage::from_request_parts(parts, state).await?;
        Ok(Self::load(storage).await)
    }
}
