// ── Course enrollment domain types ──

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

use super::contact::{ContactDetails, ContactInput, EmailAddress};
use super::course::CourseId;
use crate::pricing;

/// Auto-increment id assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub u64);

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The uniqueness key: one enrollment per (email, course).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrollmentKey {
    pub email: EmailAddress,
    pub course_id: CourseId,
}

impl fmt::Display for EnrollmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.email, self.course_id)
    }
}

// ── Enumerations ────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

// ── Submission ──────────────────────────────────────────────────────

/// A course-enrollment form as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentSubmission {
    #[serde(flatten)]
    pub contact: ContactInput,
    pub course_id: CourseId,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub learning_goals: Option<String>,
    /// Set when a payment callback already knows the outcome.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub amount_paid: Option<Decimal>,
}

// ── Records ─────────────────────────────────────────────────────────

/// An accepted enrollment, priced and ready to insert. The store assigns
/// the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnrollment {
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub course_id: CourseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub experience_level: ExperienceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_goals: Option<String>,
    pub status: EnrollmentStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub enrolled_at: DateTime<Utc>,
}

impl NewEnrollment {
    pub fn key(&self) -> EnrollmentKey {
        EnrollmentKey {
            email: self.contact.email.clone(),
            course_id: self.course_id,
        }
    }

    pub fn with_id(self, id: EnrollmentId) -> CourseEnrollment {
        CourseEnrollment {
            id,
            contact: self.contact,
            course_id: self.course_id,
            country: self.country,
            experience_level: self.experience_level,
            learning_goals: self.learning_goals,
            status: self.status,
            payment_status: self.payment_status,
            amount_paid: self.amount_paid,
            platform_fee: self.platform_fee,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
            enrolled_at: self.enrolled_at,
        }
    }
}

/// An enrollment as persisted. Pricing is frozen at creation: later course
/// price changes never touch existing rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub id: EnrollmentId,
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub course_id: CourseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_goals: Option<String>,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    #[serde(default = "Utc::now")]
    pub enrolled_at: DateTime<Utc>,
}

impl CourseEnrollment {
    pub fn key(&self) -> EnrollmentKey {
        EnrollmentKey {
            email: self.contact.email.clone(),
            course_id: self.course_id,
        }
    }

    /// Record an externally-reported payment status. Marking an enrollment
    /// paid with no amount on file assumes the full total was paid.
    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.payment_status = status;
        self.amount_paid = pricing::settle_amount_paid(status, self.amount_paid, self.total_amount);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn enrollment() -> CourseEnrollment {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "first_name": "Bob",
            "last_name": "Builder",
            "email": "Bob@Example.com",
            "course_id": 5,
            "platform_fee": "10.00",
            "tax_amount": "20.90",
            "total_amount": "229.90"
        }))
        .unwrap()
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let e = enrollment();
        assert_eq!(e.id, EnrollmentId(7));
        assert_eq!(e.contact.email.as_str(), "bob@example.com");
        assert_eq!(e.status, EnrollmentStatus::Pending);
        assert_eq!(e.payment_status, PaymentStatus::Pending);
        assert_eq!(e.key().to_string(), "bob@example.com/5");
    }

    #[test]
    fn marking_paid_defaults_amount_to_total() {
        let mut e = enrollment();
        e.set_payment_status(PaymentStatus::Paid);
        assert_eq!(e.amount_paid, Some("229.90".parse().unwrap()));
    }

    #[test]
    fn marking_paid_keeps_explicit_amount() {
        let mut e = enrollment();
        e.amount_paid = Some("100.00".parse().unwrap());
        e.set_payment_status(PaymentStatus::Paid);
        assert_eq!(e.amount_paid, Some("100.00".parse().unwrap()));
    }

    #[test]
    fn other_statuses_leave_amount_unset() {
        let mut e = enrollment();
        e.set_payment_status(PaymentStatus::Failed);
        assert_eq!(e.amount_paid, None);
    }
}
