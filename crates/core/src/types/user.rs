//! Signed-in user identity.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// The user record kept in the session under the `user` key.
///
/// Stored and replaced as a whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Initials for the avatar placeholder (at most two letters).
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// First word of the name, or the email local part when the name is blank.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or_else(|| self.email.local_part())
    }

    /// Merge a partial update into this user.
    ///
    /// Fields left as `None` in the patch keep their current value.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = if avatar.trim().is_empty() {
                None
            } else {
                Some(avatar)
            };
        }
    }
}

/// A partial user update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    /// `Some("")` clears the avatar.
    pub avatar: Option<String>,
}

impl UserPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}
