// ── Demo booking domain types ──

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use uuid::Uuid;

use super::contact::{ContactDetails, ContactInput};

// ── BookingId ───────────────────────────────────────────────────────

/// Unique token generated for every accepted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookingId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ── TimeSlot ────────────────────────────────────────────────────────

/// One of the 16 bookable half-hour slots. There is no 12:30 slot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
pub enum TimeSlot {
    #[serde(rename = "09:00")]
    #[strum(serialize = "09:00")]
    T0900,
    #[serde(rename = "09:30")]
    #[strum(serialize = "09:30")]
    T0930,
    #[serde(rename = "10:00")]
    #[strum(serialize = "10:00")]
    T1000,
    #[serde(rename = "10:30")]
    #[strum(serialize = "10:30")]
    T1030,
    #[serde(rename = "11:00")]
    #[strum(serialize = "11:00")]
    T1100,
    #[serde(rename = "11:30")]
    #[strum(serialize = "11:30")]
    T1130,
    #[serde(rename = "12:00")]
    #[strum(serialize = "12:00")]
    T1200,
    #[serde(rename = "13:00")]
    #[strum(serialize = "13:00")]
    T1300,
    #[serde(rename = "13:30")]
    #[strum(serialize = "13:30")]
    T1330,
    #[serde(rename = "14:00")]
    #[strum(serialize = "14:00")]
    T1400,
    #[serde(rename = "14:30")]
    #[strum(serialize = "14:30")]
    T1430,
    #[serde(rename = "15:00")]
    #[strum(serialize = "15:00")]
    T1500,
    #[serde(rename = "15:30")]
    #[strum(serialize = "15:30")]
    T1530,
    #[serde(rename = "16:00")]
    #[strum(serialize = "16:00")]
    T1600,
    #[serde(rename = "16:30")]
    #[strum(serialize = "16:30")]
    T1630,
    #[serde(rename = "17:00")]
    #[strum(serialize = "17:00")]
    T1700,
}

impl TimeSlot {
    /// All slots in chronological order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Wire value, e.g. `"13:30"`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Start of the slot as a time of day.
    pub fn start_time(self) -> NaiveTime {
        let (h, m) = self.hour_minute();
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Human label, e.g. `"1:30 PM"`.
    pub fn label(self) -> String {
        let (h, m) = self.hour_minute();
        let suffix = if h < 12 { "AM" } else { "PM" };
        let h12 = if h > 12 { h - 12 } else { h };
        format!("{h12}:{m:02} {suffix}")
    }

    fn hour_minute(self) -> (u32, u32) {
        let s = self.as_str();
        let hour = s.get(0..2).and_then(|h| h.parse().ok()).unwrap_or(0);
        let minute = s.get(3..5).and_then(|m| m.parse().ok()).unwrap_or(0);
        (hour, minute)
    }
}

// ── Enumerations ────────────────────────────────────────────────────

/// Booking lifecycle. Only administrative action moves a booking off
/// `Pending`; the guard only ever creates pending bookings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Pending and confirmed bookings occupy a slot and count toward the
    /// per-email cap.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// What the demo is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceType {
    Automation,
    Ai,
    Development,
    Data,
    Security,
    Training,
    Consulting,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeetingPlatform {
    #[default]
    Zoom,
    Teams,
    Google,
    Other,
}

// ── Submission ──────────────────────────────────────────────────────

fn default_attendees() -> u32 {
    1
}

/// A demo-booking form as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSubmission {
    #[serde(flatten)]
    pub contact: ContactInput,
    #[serde(default)]
    pub job_title: String,
    pub demo_date: NaiveDate,
    pub demo_time: TimeSlot,
    #[serde(default)]
    pub demo_title: String,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub demo_message: Option<String>,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default = "default_attendees")]
    pub number_of_attendees: u32,
    #[serde(default)]
    pub meeting_platform: MeetingPlatform,
    /// Hidden form field; humans leave it empty.
    #[serde(default, alias = "website")]
    pub honeypot: Option<String>,
}

// ── Record ──────────────────────────────────────────────────────────

/// A demo booking as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoBooking {
    #[serde(default = "BookingId::generate")]
    pub booking_id: BookingId,
    #[serde(flatten)]
    pub contact: ContactDetails,
    #[serde(default)]
    pub job_title: String,
    pub demo_date: NaiveDate,
    pub demo_time: TimeSlot,
    #[serde(default)]
    pub demo_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_message: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default = "default_attendees")]
    pub number_of_attendees: u32,
    #[serde(default)]
    pub meeting_platform: MeetingPlatform,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl DemoBooking {
    /// Demo date and slot combined (naive, same zone as the calendar).
    pub fn demo_datetime(&self) -> NaiveDateTime {
        self.demo_date.and_time(self.demo_time.start_time())
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.demo_datetime() > now.naive_utc()
    }

    /// e.g. `"June 02, 2025"`.
    pub fn formatted_date(&self) -> String {
        self.demo_date.format("%B %d, %Y").to_string()
    }

    /// e.g. `"June 02, 2025 at 10:00 AM"`.
    pub fn formatted_datetime(&self) -> String {
        format!("{} at {}", self.formatted_date(), self.demo_time.label())
    }
}
