//! Email address awaiting verification.

use bazaar_core::{Email, ResendCountdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Container, Persisted};
use crate::models::session_keys;

/// The address a code was sent to and the resend countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingVerification {
    pub email: Email,
    pub countdown: ResendCountdown,
}

impl Persisted for Option<PendingVerification> {
    const KEY: &'static str = session_keys::PENDING_VERIFICATION;
}

pub type VerificationContainer = Container<Option<PendingVerification>>;

impl Container<Option<PendingVerification>> {
    /// The pending verification, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingVerification> {
        self.value.as_ref()
    }

    /// Remember the address and start the countdown.
    pub async fn start(&mut self, email: Email, now: DateTime<Utc>) {
        self.replace(Some(PendingVerification {
            email,
            countdown: ResendCountdown::start(now),
        }))
        .await;
    }

    /// Restart the countdown. Returns `false` if nothing is pending.
    pub async fn restart_countdown(&mut self, now: DateTime<Utc>) -> bool {
        if self.value.is_none() {
            return false;
        }
        self.update(|pending| {
            pending
                .as_mut()
                .map(|pending| pending.countdown.reset(now))
                .is_some()
        })
        .await
    }

    /// Forget the pending verification.
    pub async fn finish(&mut self) {
        self.reset().await;
    }
}
