//! Signed-in user.

use bazaar_core::{User, UserPatch};

use super::{Container, Persisted};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::session_keys;

impl Persisted for Option<User> {
    const KEY: &'static str = session_keys::USER;
}

/// The session user, or `None` for guests.
pub type SessionContainer = Container<Option<User>>;

impl Container<Option<User>> {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.value.as_ref()
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.value.is_some()
    }

    /// Store the user, replacing any previous one.
    ///
    /// The session ID is cycled first to prevent fixation.
    pub async fn login(&mut self, user: User) {
        self.storage.renew().await;
        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::info!(user_id = %user.id, "User signed in");
        self.replace(Some(user)).await;
    }

    /// Delete the stored user.
    pub async fn logout(&mut self) {
        if let Some(user) = &self.value {
            tracing::info!(user_id = %user.id, "User signed out");
        }
        clear_sentry_user();
        self.reset().await;
    }

    /// Merge a partial update into the stored user and persist it.
    ///
    /// Returns the merged user, or `None` (without writing) when nobody is
    /// signed in.
    pub async fn update_user(&mut self, patch: UserPatch) -> Option<User> {
        if self.value.is_none() {
            return None;
        }
        self.update(|user| {
            user.as_mut().map(|user| {
                user.apply(patch);
                user.clone()
            })
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Email, UserId};

    use super::*;
    use crate::containers::{Storage, testing};

    fn jane() -> User {
        User {
            id: UserId::new(1),
            name: "Jane Doe".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_login_persists_user() {
        let storage = testing::storage();
        let mut session = SessionContainer::load(storage.clone()).await;
        assert!(!session.is_logged_in());

        session.login(jane()).await;

        let stored: Option<User> = storage.read(session_keys::USER).await;
        assert_eq!(stored, Some(jane()));
    }

    #[tokio::test]
    async fn test_update_user_merges_patch() {
        let storage = testing::storage();
        let mut session = SessionContainer::load(storage.clone()).await;
        session.login(jane()).await;

        let merged = session
            .update_user(UserPatch {
                name: Some("Jane Smith".to_string()),
                ..UserPatch::default()
            })
            .await
            .unwrap();

        assert_eq!(merged.name, "Jane Smith");
        assert_eq!(merged.email.as_str(), "jane@example.com");

        let reloaded = SessionContainer::load(storage).await;
        assert_eq!(reloaded.user().unwrap().name, "Jane Smith");
    }

    #[tokio::test]
    async fn test_update_user_without_login_is_noop() {
        let storage = testing::storage();
        let mut session = SessionContainer::load(storage.clone()).await;

        let merged = session
            .update_user(UserPatch {
                name: Some("Nobody".to_string()),
                ..UserPatch::default()
            })
            .await;

        assert_eq!(merged, None);
        assert_eq!(storage.read::<Option<User>>(session_keys::USER).await, None);
    }

    #[tokio::test]
    async fn test_logout_clears_user() {
        let storage: Storage = testing::storage();
        let mut session = SessionContainer::load(storage.clone()).await;
        session.login(jane()).await;
        session.logout().await;

        assert!(session.user().is_none());
        let reloaded = SessionContainer::load(storage).await;
        assert!(!reloaded.is_logged_in());
    }
}
