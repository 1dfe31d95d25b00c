//! Email verification codes and the resend countdown.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Seconds before another code may be requested.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

/// Errors from verification code handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("verification code must be exactly 6 digits")]
    InvalidFormat,
    #[error("verification code is incorrect")]
    Mismatch,
}

/// A six-digit verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Parse a code, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::InvalidFormat` unless the input is exactly
    /// six ASCII digits.
    pub fn parse(input: &str) -> Result<Self, VerificationError> {
        let code = input.trim();
        if code.len() != CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VerificationError::InvalidFormat);
        }
        Ok(Self(code.to_string()))
    }

    /// Check a submitted code against this one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for malformed input and `Mismatch` for a
    /// well-formed code that differs.
    pub fn verify(&self, submitted: &str) -> Result<(), VerificationError> {
        let submitted = Self::parse(submitted)?;
        if submitted == *self {
            Ok(())
        } else {
            Err(VerificationError::Mismatch)
        }
    }

    /// The code as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VerificationCode {
    type Error = VerificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VerificationCode> for String {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for VerificationCode {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Cosmetic countdown shown next to the "resend code" button.
///
/// Resending is never refused; restarting always resets the countdown to the
/// full cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendCountdown {
    started_at: DateTime<Utc>,
}

impl ResendCountdown {
    /// Start a countdown at `now`.
    #[must_use]
    pub const fn start(now: DateTime<Utc>) -> Self {
        Self { started_at: now }
    }

    /// Restart the countdown at `now`.
    pub const fn reset(&mut self, now: DateTime<Utc>) {
        self.started_at = now;
    }

    /// Whole seconds left at `now`, never negative.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.started_at).num_seconds().max(0);
        (RESEND_COOLDOWN_SECS - elapsed).max(0)
    }

    /// Whether the countdown has run out.
    #[must_use]
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now) == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn test_parse_requires_six_digits() {
        assert!(VerificationCode::parse("123456").is_ok());
        assert!(VerificationCode::parse(" 000000 ").is_ok());
        for bad in ["", "12345", "1234567", "12a456", "12 456"] {
            assert_eq!(
                VerificationCode::parse(bad),
                Err(VerificationError::InvalidFormat),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_verify() {
        let expected = VerificationCode::parse("123456").unwrap();
        assert_eq!(expected.verify("123456"), Ok(()));
        assert_eq!(expected.verify("654321"), Err(VerificationError::Mismatch));
        assert_eq!(expected.verify("abc"), Err(VerificationError::InvalidFormat));
    }

    #[test]
    fn test_countdown() {
        let now = Utc::now();
        let mut countdown = ResendCountdown::start(now);
        assert_eq!(countdown.remaining(now), 60);
        assert_eq!(countdown.remaining(now + TimeDelta::seconds(45)), 15);
        assert!(countdown.is_finished(now + TimeDelta::seconds(90)));

        let later = now + TimeDelta::seconds(50);
        countdown.reset(later);
        assert_eq!(countdown.remaining(later), 60);
    }

    #[test]
    fn test_serde() {
        let code: VerificationCode = serde_json::from_str("\"987654\"").unwrap();
        assert_eq!(code.as_str(), "987654");
        assert!(serde_json::from_str::<VerificationCode>("\"98765\"").is_err());
    }
}
