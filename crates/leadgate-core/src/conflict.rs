// ── Conflict checker ──
//
// Business rules evaluated against persisted state. Rules run in a fixed
// order and the first violation is the reported reason; violations are
// never aggregated.
//
// These reads happen without a lock, so the result is advisory: two
// concurrent submissions can both pass the slot and pending-cap checks.
// Enrollment uniqueness has a hard backstop in the store's insert.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::debug;

use crate::config::GuardConfig;
use crate::error::{CoreError, RejectReason, Rejection};
use crate::model::{CourseId, CourseRef, EmailAddress, ProjectId, ProjectRef, TimeSlot};
use crate::store::{BookingQuery, CourseLookup, EnrollmentQuery, ProjectLookup};

/// Outcome of a conflict check. `Accepted` may carry what the check
/// looked up along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T = ()> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> Verdict<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Accepted(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Rejection> {
        match self {
            Self::Accepted(v) => Ok(v),
            Self::Rejected(r) => Err(r),
        }
    }
}

impl<T> From<Result<T, Rejection>> for Verdict<T> {
    fn from(result: Result<T, Rejection>) -> Self {
        match result {
            Ok(v) => Self::Accepted(v),
            Err(r) => Self::Rejected(r),
        }
    }
}

/// Applies the booking and enrollment rules from a `GuardConfig`.
#[derive(Debug, Clone, Copy)]
pub struct ConflictChecker<'a> {
    config: &'a GuardConfig,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(config: &'a GuardConfig) -> Self {
        Self { config }
    }

    /// Demo dates must be after today, on a weekday, and within the
    /// booking horizon. A horizon that runs past the last representable
    /// date imposes no upper bound.
    pub fn check_demo_date(&self, date: NaiveDate, today: NaiveDate) -> Result<(), Rejection> {
        let invalid = |message: String| {
            Rejection::on_field(RejectReason::InvalidDate, "demo_date").with_message(message)
        };

        if date <= today {
            return Err(invalid(
                "Please select a future date for the demo.".to_owned(),
            ));
        }
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(invalid("Demos are only available on weekdays.".to_owned()));
        }
        let horizon = self.config.booking_horizon_days;
        let beyond_horizon = today
            .checked_add_days(Days::new(u64::from(horizon)))
            .is_some_and(|limit| date > limit);
        if beyond_horizon {
            return Err(invalid(format!(
                "Please select a date within the next {horizon} days."
            )));
        }
        Ok(())
    }

    /// Date rules, then slot capacity, then the per-email pending cap.
    pub fn check_booking<S>(
        &self,
        store: &S,
        email: &EmailAddress,
        date: NaiveDate,
        slot: TimeSlot,
        today: NaiveDate,
    ) -> Result<Verdict, CoreError>
    where
        S: BookingQuery + ?Sized,
    {
        if let Err(rejection) = self.check_demo_date(date, today) {
            return Ok(Verdict::Rejected(rejection));
        }

        let in_slot = store.count_active_in_slot(date, slot)?;
        debug!(%date, %slot, in_slot, capacity = self.config.slot_capacity, "slot occupancy");
        if in_slot >= self.config.slot_capacity {
            return Ok(Verdict::Rejected(
                Rejection::on_field(RejectReason::SlotFull, "demo_time").with_message(format!(
                    "This time slot ({slot}) is already booked. Please choose another time."
                )),
            ));
        }

        let pending = store.count_active_for_email(email, today)?;
        debug!(pending, cap = self.config.max_pending_per_email, "pending bookings for email");
        if pending >= self.config.max_pending_per_email {
            return Ok(Verdict::Rejected(Rejection::on_field(
                RejectReason::TooManyPending,
                "email",
            )));
        }

        Ok(Verdict::Accepted(()))
    }

    /// Course must exist and be active, then (email, course) must be new.
    /// On success yields the course so the caller can price it.
    pub fn check_enrollment<S>(
        &self,
        store: &S,
        email: &EmailAddress,
        course_id: CourseId,
    ) -> Result<Verdict<CourseRef>, CoreError>
    where
        S: EnrollmentQuery + CourseLookup + ?Sized,
    {
        let course = match store.course(course_id)? {
            Some(course) if course.is_active => course,
            found => {
                debug!(%course_id, found = found.is_some(), "course not enrollable");
                return Ok(Verdict::Rejected(Rejection::on_field(
                    RejectReason::CourseUnavailable,
                    "course_id",
                )));
            }
        };

        if store.enrollment_exists(email, course_id)? {
            return Ok(Verdict::Rejected(Rejection::on_field(
                RejectReason::AlreadyEnrolled,
                "email",
            )));
        }

        Ok(Verdict::Accepted(course))
    }

    /// A named project must exist and be available. A request without one
    /// is a custom project and always passes.
    pub fn check_project<S>(
        &self,
        store: &S,
        project_id: Option<ProjectId>,
    ) -> Result<Verdict<Option<ProjectRef>>, CoreError>
    where
        S: ProjectLookup + ?Sized,
    {
        let Some(project_id) = project_id else {
            return Ok(Verdict::Accepted(None));
        };
        match store.project(project_id)? {
            Some(project) if project.is_available => Ok(Verdict::Accepted(Some(project))),
            found => {
                debug!(%project_id, found = found.is_some(), "project not requestable");
                Ok(Verdict::Rejected(Rejection::on_field(
                    RejectReason::ProjectUnavailable,
                    "project_id",
                )))
            }
        }
    }
}
