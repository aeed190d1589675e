// ── Core error types ──
//
// Two families live here. `CoreError` is a system failure (a store that
// could not answer, a broken snapshot). `Rejection` is a user-facing,
// recoverable outcome: the submitter fixes their input and resubmits.
// The guard never turns one into the other except for the enrollment
// uniqueness backstop (see `Intake`).

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Unified system error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Store errors ─────────────────────────────────────────────────
    #[error("Store operation failed: {message}")]
    Store { message: String },

    #[error("{entity_type} already exists: {key}")]
    Duplicate { entity_type: String, key: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Rejections ───────────────────────────────────────────────────────

/// Why a submission was turned away.
///
/// The snake_case form (`slot_full`, `already_enrolled`, ...) is the stable
/// code handed to callers and used on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    InvalidEmail,
    InvalidPhone,
    InvalidName,
    InvalidDate,
    SlotFull,
    TooManyPending,
    CourseUnavailable,
    AlreadyEnrolled,
    TermsNotAccepted,
    InvalidAttendeeCount,
    InvalidCountry,
    MissingField,
    FieldTooLong,
    ProjectUnavailable,
    Spam,
}

impl RejectReason {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Generic message shown when no more specific one was attached.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidEmail => "Enter a valid email address.",
            Self::InvalidPhone => "Enter a valid phone number.",
            Self::InvalidName => "Enter a valid name using letters, spaces, or hyphens.",
            Self::InvalidDate => "Please select a valid demo date.",
            Self::SlotFull => "This time slot is already booked. Please choose another time.",
            Self::TooManyPending => {
                "You have too many pending demos. Please wait for confirmation on existing bookings."
            }
            Self::CourseUnavailable => "This course is not available for enrollment.",
            Self::AlreadyEnrolled => "You are already enrolled in this course.",
            Self::TermsNotAccepted => "Please accept the terms and conditions.",
            Self::InvalidAttendeeCount => "Please enter a valid number of attendees.",
            Self::InvalidCountry => "Please select a supported country.",
            Self::MissingField => "This field is required.",
            Self::FieldTooLong => "This value is too long.",
            Self::ProjectUnavailable => "This project is not available.",
            Self::Spam => "Spam detected.",
        }
    }

    /// Whether this reason comes from field-level input validation rather
    /// than a conflict with existing records.
    pub fn is_input_error(self) -> bool {
        matches!(
            self,
            Self::InvalidEmail
                | Self::InvalidPhone
                | Self::InvalidName
                | Self::InvalidDate
                | Self::TermsNotAccepted
                | Self::InvalidAttendeeCount
                | Self::InvalidCountry
                | Self::MissingField
                | Self::FieldTooLong
        )
    }
}

/// A user-facing rejection: reason code, offending field, and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct Rejection {
    pub reason: RejectReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl Rejection {
    pub fn new(reason: RejectReason) -> Self {
        Self {
            reason,
            field: None,
            message: reason.default_message().to_owned(),
        }
    }

    /// A rejection pinned to a specific input field.
    pub fn on_field(reason: RejectReason, field: &str) -> Self {
        Self {
            field: Some(field.to_owned()),
            ..Self::new(reason)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<RejectReason> for Rejection {
    fn from(reason: RejectReason) -> Self {
        Self::new(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn reason_codes_are_snake_case() {
        assert_eq!(RejectReason::SlotFull.code(), "slot_full");
        assert_eq!(RejectReason::TooManyPending.code(), "too_many_pending");
        assert_eq!(RejectReason::AlreadyEnrolled.to_string(), "already_enrolled");
    }

    #[test]
    fn reason_code_round_trips_through_from_str() {
        for reason in RejectReason::iter() {
            assert_eq!(RejectReason::from_str(reason.code()), Ok(reason));
        }
    }

    #[test]
    fn rejection_on_field_keeps_default_message() {
        let r = Rejection::on_field(RejectReason::InvalidPhone, "phone");
        assert_eq!(r.field.as_deref(), Some("phone"));
        assert_eq!(r.message, "Enter a valid phone number.");
        assert_eq!(r.to_string(), r.message);
    }

    #[test]
    fn conflict_reasons_are_not_input_errors() {
        assert!(!RejectReason::SlotFull.is_input_error());
        assert!(!RejectReason::AlreadyEnrolled.is_input_error());
        assert!(RejectReason::InvalidDate.is_input_error());
        assert!(RejectReason::InvalidCountry.is_input_error());
        assert!(!RejectReason::ProjectUnavailable.is_input_error());
    }
}
