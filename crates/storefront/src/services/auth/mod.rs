//! Authentication service.
//!
//! Password accounts live in memory. Registration, verification and password
//! reset each wait out the simulated backend latency before answering.

mod error;

pub use error::AuthError;

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use moka::future::Cache;
use tracing::instrument;

use bazaar_core::{Email, User, UserId, UserPatch, VerificationCode};

use super::fixtures;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long a password reset request stays valid.
const RESET_TTL: Duration = Duration::from_secs(15 * 60);

struct Account {
    user: User,
    password_hash: String,
    verified: bool,
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

/// Authentication service.
///
/// Handles registration, login, email verification and password reset.
pub struct AuthService {
    accounts: RwLock<HashMap<Email, Account>>,
    next_id: AtomicI32,
    resets: Cache<Email, DateTime<Utc>>,
    verification_code: VerificationCode,
    latency: Duration,
}

impl AuthService {
    /// Create an empty account store.
    #[must_use]
    pub fn new(verification_code: VerificationCode, latency: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
            resets: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(RESET_TTL)
                .build(),
            verification_code,
            latency,
        }
    }

    /// Create an account store holding the verified demo account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the demo password cannot be hashed.
    pub fn with_demo_account(
        verification_code: VerificationCode,
        latency: Duration,
    ) -> Result<Self, AuthError> {
        let service = Self::new(verification_code, latency);
        let email = Email::parse(fixtures::DEMO_EMAIL)?;
        let user = User {
            id: fixtures::DEMO_USER_ID,
            name: fixtures::DEMO_NAME.to_string(),
            email: email.clone(),
            avatar: None,
        };
        let account = Account {
            user,
            password_hash: hash_password(fixtures::DEMO_PASSWORD)?,
            verified: true,
        };

        service
            .accounts
            .write()
            .map_err(|_| AuthError::LockPoisoned)?
            .insert(email, account);
        service
            .next_id
            .store(fixtures::DEMO_USER_ID.as_i32() + 1, Ordering::Relaxed);
        Ok(service)
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Copy a profile update into the account store.
    ///
    /// An email change re-keys the account so the new address signs in.
    ///
    /// # Errors
    ///
    /// Returns `UserAlreadyExists` if the new email belongs to another
    /// account and `UserNotFound` if `current` has no account.
    #[instrument(skip(self, patch), fields(email = %current))]
    pub fn update_profile(&self, current: &Email, patch: &UserPatch) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().map_err(|_| AuthError::LockPoisoned)?;
        if let Some(email) = &patch.email
            && email != current
            && accounts.contains_key(email)
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let mut account = accounts.remove(current).ok_or(AuthError::UserNotFound)?;
        account.user.apply(patch.clone());
        accounts.insert(account.user.email.clone(), account);
        Ok(())
    }

    /// Register a new, unverified account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, invalid email, short
    /// password or mismatched confirmation, and `UserAlreadyExists` if the
    /// email is taken.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn register(&self, form: Registration<'_>) -> Result<User, AuthError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(form.email)?;
        validate_password(form.password)?;
        if form.password != form.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        self.delay().await;
        let password_hash = hash_password(form.password)?;

        let mut accounts = self.accounts.write().map_err(|_| AuthError::LockPoisoned)?;
        if accounts.contains_key(&email) {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            name: name.to_string(),
            email: email.clone(),
            avatar: None,
        };
        accounts.insert(
            email,
            Account {
                user: user.clone(),
                password_hash,
                verified: false,
            },
        );
        drop(accounts);

        tracing::info!(user_id = %user.id, "Account registered, awaiting verification");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong
    /// and `AuthError::Unverified` if the email has not been verified yet.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        self.delay().await;
        let (user, password_hash, verified) = {
            let accounts = self.accounts.read().map_err(|_| AuthError::LockPoisoned)?;
            let account = accounts.get(&email).ok_or(AuthError::InvalidCredentials)?;
            (
                account.user.clone(),
                account.password_hash.clone(),
                account.verified,
            )
        };

        verify_password(password, &password_hash)?;
        if !verified {
            return Err(AuthError::Unverified(email));
        }
        Ok(user)
    }

    /// Confirm an email address with the verification code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Verification` for a malformed or wrong code and
    /// `AuthError::UserNotFound` if no account uses the email.
    #[instrument(skip(self, code))]
    pub async fn verify_email(&self, email: &Email, code: &str) -> Result<User, AuthError> {
        self.verification_code.verify(code)?;

        self.delay().await;
        let mut accounts = self.accounts.write().map_err(|_| AuthError::LockPoisoned)?;
        let account = accounts.get_mut(email).ok_or(AuthError::UserNotFound)?;
        account.verified = true;
        let user = account.user.clone();
        drop(accounts);

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    /// Simulate sending a fresh verification code.
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, email: &Email) {
        self.delay().await;
        tracing::info!("Verification code resent");
    }

    /// Start a password reset.
    ///
    /// Always succeeds so the response does not reveal whether an account
    /// exists; only known accounts get a pending reset.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) {
        self.delay().await;
        let Ok(email) = Email::parse(email) else {
            return;
        };
        let known = self
            .accounts
            .read()
            .map(|accounts| accounts.contains_key(&email))
            .unwrap_or(false);
        if known {
            self.resets.insert(email, Utc::now()).await;
            tracing::info!("Password reset requested");
        }
    }

    /// Finish a password reset with the emailed code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoPendingReset` if no reset is pending for the
    /// email, a verification error for a bad code, and a validation error for
    /// an unacceptable new password.
    #[instrument(skip(self, code, password, password_confirm))]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        self.verification_code.verify(code)?;
        validate_password(password)?;
        if password != password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        self.delay().await;
        if self.resets.get(&email).await.is_none() {
            return Err(AuthError::NoPendingReset);
        }
        let password_hash = hash_password(password)?;

        {
            let mut accounts = self.accounts.write().map_err(|_| AuthError::LockPoisoned)?;
            let account = accounts.get_mut(&email).ok_or(AuthError::NoPendingReset)?;
            account.password_hash = password_hash;
        }
        self.resets.invalidate(&email).await;

        tracing::info!("Password reset completed");
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::VerificationError;

    use super::*;

    fn service() -> AuthService {
        AuthService::with_demo_account(VerificationCode::parse("123456").unwrap(), Duration::ZERO)
            .unwrap()
    }

    fn registration<'a>(email: &'a str, password: &'a str) -> Registration<'a> {
        Registration {
            name: "Ada Lovelace",
            email,
            password,
            password_confirm: password,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(verify_password("wrong horse", &hash).is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[tokio::test]
    async fn test_demo_login() {
        let auth = service();
        let user = auth
            .login(fixtures::DEMO_EMAIL, fixtures::DEMO_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.id, fixtures::DEMO_USER_ID);
        assert!(matches!(
            auth.login(fixtures::DEMO_EMAIL, "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let auth = service();
        let user = auth
            .register(registration("ada@example.com", "analytical"))
            .await
            .unwrap();
        assert_ne!(user.id, fixtures::DEMO_USER_ID);

        assert!(matches!(
            auth.login("ada@example.com", "analytical").await,
            Err(AuthError::Unverified(_))
        ));
        assert!(matches!(
            auth.register(registration("ADA@example.com", "analytical")).await,
            Err(AuthError::UserAlreadyExists)
        ));

        let email = Email::parse("ada@example.com").unwrap();
        assert!(matches!(
            auth.verify_email(&email, "000000").await,
            Err(AuthError::Verification(VerificationError::Mismatch))
        ));
        assert!(matches!(
            auth.verify_email(&email, "12345").await,
            Err(AuthError::Verification(VerificationError::InvalidFormat))
        ));
        auth.verify_email(&email, "123456").await.unwrap();
        assert!(auth.login("ada@example.com", "analytical").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let auth = service();
        let mut form = registration("bob@example.com", "password1");
        form.password_confirm = "password2";
        assert!(matches!(
            auth.register(form).await,
            Err(AuthError::PasswordMismatch)
        ));

        let mut form = registration("bob@example.com", "password1");
        form.name = "  ";
        assert!(matches!(auth.register(form).await, Err(AuthError::MissingName)));

        assert!(matches!(
            auth.register(registration("not-an-email", "password1")).await,
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_email_change_moves_the_login() {
        let auth = service();
        auth.register(registration("ada@example.com", "analytical"))
            .await
            .unwrap();

        let demo = Email::parse(fixtures::DEMO_EMAIL).unwrap();
        let taken = UserPatch {
            email: Some(Email::parse("ada@example.com").unwrap()),
            ..UserPatch::default()
        };
        assert!(matches!(
            auth.update_profile(&demo, &taken),
            Err(AuthError::UserAlreadyExists)
        ));

        let patch = UserPatch {
            name: Some("Jane Smith".to_string()),
            email: Some(Email::parse("jane.smith@example.com").unwrap()),
            avatar: None,
        };
        auth.update_profile(&demo, &patch).unwrap();

        assert!(matches!(
            auth.login(fixtures::DEMO_EMAIL, fixtures::DEMO_PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
        let user = auth
            .login("jane.smith@example.com", fixtures::DEMO_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.id, fixtures::DEMO_USER_ID);
        assert_eq!(user.name, "Jane Smith");

        let stranger = Email::parse("nobody@example.com").unwrap();
        assert!(matches!(
            auth.update_profile(&stranger, &UserPatch::default()),
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_password_reset_requires_request() {
        let auth = service();
        assert!(matches!(
            auth.reset_password(fixtures::DEMO_EMAIL, "123456", "new-password", "new-password")
                .await,
            Err(AuthError::NoPendingReset)
        ));

        auth.request_password_reset(fixtures::DEMO_EMAIL).await;
        auth.reset_password(fixtures::DEMO_EMAIL, "123456", "new-password", "new-password")
            .await
            .unwrap();
        assert!(auth.login(fixtures::DEMO_EMAIL, "new-password").await.is_ok());

        // The reset is consumed.
        assert!(matches!(
            auth.reset_password(fixtures::DEMO_EMAIL, "123456", "another-one", "another-one")
                .await,
            Err(AuthError::NoPendingReset)
        ));
    }

    #[tokio::test]
    async fn test_reset_for_unknown_email_is_silent() {
        let auth = service();
        auth.request_password_reset("nobody@example.com").await;
        assert!(matches!(
            auth.reset_password("nobody@example.com", "123456", "password1", "password1")
                .await,
            Err(AuthError::NoPendingReset)
        ));
    }
}
