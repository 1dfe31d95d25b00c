//! Saved shipping addresses.

use serde::{Deserialize, Serialize};

use super::AddressId;

/// Address label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    #[default]
    Home,
    Work,
    Other,
}

impl AddressType {
    /// All address types, in form order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Work, Self::Other];

    /// Machine-readable value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Work => "work",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Work => "Work",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|address_type| address_type.as_str() == s)
            .ok_or_else(|| format!("invalid address type: {s}"))
    }
}

/// Address fields as submitted by the address form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    pub address_type: AddressType,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

impl NewAddress {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("address", &self.address1),
            ("city", &self.city),
            ("state", &self.state),
            ("ZIP code", &self.zip),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A saved address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub address_type: AddressType,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

impl Address {
    /// Build a saved address from form input.
    #[must_use]
    pub fn from_new(id: AddressId, new: NewAddress) -> Self {
        Self {
            id,
            address_type: new.address_type,
            first_name: new.first_name,
            last_name: new.last_name,
            address1: new.address1,
            address2: new.address2.filter(|line| !line.trim().is_empty()),
            city: new.city,
            state: new.state,
            zip: new.zip,
            country: new.country,
            phone: new.phone,
            is_default: new.is_default,
        }
    }

    /// Recipient name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "City, ST 12345" line.
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip)
    }
}
