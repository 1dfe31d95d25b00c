//! Coupon applied to the cart.

use serde::{Deserialize, Serialize};

use super::{Container, Persisted};
use crate::models::session_keys;

/// Code of the coupon applied at checkout, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppliedCoupon(Option<String>);

impl AppliedCoupon {
    /// The applied code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl Persisted for AppliedCoupon {
    const KEY: &'static str = session_keys::APPLIED_COUPON;
}

pub type CouponContainer = Container<AppliedCoupon>;

impl Container<AppliedCoupon> {
    /// Apply a code, replacing any previous one. Stored upper-cased.
    pub async fn apply(&mut self, code: &str) {
        self.replace(AppliedCoupon(Some(code.trim().to_ascii_uppercase())))
            .await;
    }

    /// Remove the applied code.
    pub async fn remove(&mut self) {
        self.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::testing;

    #[tokio::test]
    async fn test_apply_and_remove() {
        let storage = testing::storage();
        let mut coupon = CouponContainer::load(storage.clone()).await;
        assert_eq!(coupon.code(), None);

        coupon.apply(" welcome10 ").await;
        let reloaded = CouponContainer::load(storage.clone()).await;
        assert_eq!(reloaded.code(), Some("WELCOME10"));

        coupon.remove().await;
        let reloaded = CouponContainer::load(storage).await;
        assert_eq!(reloaded.code(), None);
    }
}
