// ── Contact identity types ──
//
// EmailAddress and PhoneNumber can only be built through the normalizer,
// so holding one means the value is already trimmed, lower-cased (email),
// compacted (phone), and grammar-checked. Deserialization goes through the
// same path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Rejection;
use crate::normalize;

// ── EmailAddress ────────────────────────────────────────────────────

/// Email address, normalized to trimmed lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize::normalize_email(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = Rejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize::normalize_email(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

// ── PhoneNumber ─────────────────────────────────────────────────────

/// Phone number with spaces, hyphens, and parentheses removed
/// (`+1 (555) 123-4567` becomes `+15551234567`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize::normalize_phone(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = Rejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize::normalize_phone(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

// ── Contact blocks ──────────────────────────────────────────────────

/// Contact fields exactly as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Contact fields after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ContactDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
