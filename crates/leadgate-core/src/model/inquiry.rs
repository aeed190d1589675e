// ── Contact inquiry domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

use super::contact::{ContactDetails, ContactInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryId(pub u64);

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Department {
    Sales,
    Support,
    Partnership,
    Careers,
    #[default]
    General,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    New,
    InProgress,
    Responded,
    Closed,
    Spam,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

/// A contact form as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquirySubmission {
    #[serde(flatten)]
    pub contact: ContactInput,
    #[serde(default)]
    pub department: Department,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub newsletter_subscribed: bool,
    /// Browser session the form was posted from, if known.
    #[serde(default)]
    pub session_key: Option<String>,
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// An accepted inquiry, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInquiry {
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub department: Department,
    pub subject: String,
    pub message: String,
    pub newsletter_subscribed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    pub status: InquiryStatus,
    pub priority: Priority,
    /// Message contains link or sales keywords. Informational only.
    #[serde(default)]
    pub suspicious: bool,
    pub created_at: DateTime<Utc>,
}

impl NewInquiry {
    pub fn with_id(self, id: InquiryId) -> ContactInquiry {
        ContactInquiry { id, inquiry: self }
    }
}

/// An inquiry as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub id: InquiryId,
    #[serde(flatten)]
    pub inquiry: NewInquiry,
}

impl ContactInquiry {
    pub fn is_spam(&self) -> bool {
        self.inquiry.status == InquiryStatus::Spam
    }
}
