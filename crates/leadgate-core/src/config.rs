// ── Runtime guard configuration ──
//
// Business limits the guard enforces. Core never reads config files:
// `leadgate-config` (or any other caller) builds a `GuardConfig` and
// hands it in.

use std::time::Duration;

use rust_decimal::Decimal;

/// Limits and rates applied by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Active bookings allowed to share one (date, slot) pair.
    pub slot_capacity: usize,
    /// Active upcoming bookings allowed per email address.
    pub max_pending_per_email: usize,
    /// How far ahead a demo may be booked, in days.
    pub booking_horizon_days: u32,
    /// Upper bound for `number_of_attendees` (lower bound is always 1).
    pub max_attendees: u32,
    /// Flat fee added to every course enrollment.
    pub platform_fee: Decimal,
    /// Tax applied to price + platform fee (0.10 = 10%).
    pub tax_rate: Decimal,
    /// Two inquiries from one session closer than this are marked spam.
    pub spam_window: Duration,
}

impl GuardConfig {
    pub const DEFAULT_SLOT_CAPACITY: usize = 2;
    pub const DEFAULT_MAX_PENDING_PER_EMAIL: usize = 3;
    pub const DEFAULT_BOOKING_HORIZON_DAYS: u32 = 90;
    pub const DEFAULT_MAX_ATTENDEES: u32 = 50;
    pub const DEFAULT_SPAM_WINDOW_SECS: u64 = 5;

    /// 10.00 in the store currency.
    pub fn default_platform_fee() -> Decimal {
        Decimal::new(1000, 2)
    }

    /// 10%.
    pub fn default_tax_rate() -> Decimal {
        Decimal::new(10, 2)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            slot_capacity: Self::DEFAULT_SLOT_CAPACITY,
            max_pending_per_email: Self::DEFAULT_MAX_PENDING_PER_EMAIL,
            booking_horizon_days: Self::DEFAULT_BOOKING_HORIZON_DAYS,
            max_attendees: Self::DEFAULT_MAX_ATTENDEES,
            platform_fee: Self::default_platform_fee(),
            tax_rate: Self::default_tax_rate(),
            spam_window: Duration::from_secs(Self::DEFAULT_SPAM_WINDOW_SECS),
        }
    }
}
