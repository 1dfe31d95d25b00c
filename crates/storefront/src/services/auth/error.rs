//! Authentication error types.

use thiserror::Error;

use bazaar_core::{Email, EmailError, VerificationError};

/// Errors that can occur during authentication operations.
///
/// Display strings are shown inline on the auth forms.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("Please enter a valid email address")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// User already exists.
    #[error("An account with this email already exists")]
    UserAlreadyExists,

    /// Name left blank on registration.
    #[error("Please enter your name")]
    MissingName,

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Account exists but the email has not been verified.
    #[error("Please verify your email address before signing in")]
    Unverified(Email),

    /// Verification or reset code rejected.
    #[error("{0}")]
    Verification(#[from] VerificationError),

    /// No password reset was requested (or it expired).
    #[error("This reset request has expired, please start again")]
    NoPendingReset,

    /// No account for a verification request.
    #[error("No account found for this email")]
    UserNotFound,

    /// Account store lock poisoned.
    #[error("account store unavailable")]
    LockPoisoned,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the error is a server fault rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::LockPoisoned | Self::PasswordHash)
    }
}
