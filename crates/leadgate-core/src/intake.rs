// ── Intake pipeline ──
//
// Evaluate, persist, then update counters. This is the caller-side half
// of the contract: the guard decides, `Intake` writes.

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::decision::Decision;
use crate::error::{CoreError, RejectReason, Rejection};
use crate::guard::Guard;
use crate::model::{
    BookingSubmission, ContactInquiry, CourseEnrollment, DemoBooking, EnrollmentSubmission,
    InquirySubmission, ProjectRequest, ProjectRequestSubmission,
};
use crate::store::RecordStore;

/// A guard bound to a store it can write to.
pub struct Intake<S, C = SystemClock> {
    guard: Guard<C>,
    store: S,
}

impl<S, C> Intake<S, C>
where
    S: RecordStore,
    C: Clock,
{
    pub fn new(guard: Guard<C>, store: S) -> Self {
        Self { guard, store }
    }

    pub fn guard(&self) -> &Guard<C> {
        &self.guard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn submit_demo_booking(
        &self,
        submission: &BookingSubmission,
    ) -> Result<Decision<DemoBooking>, CoreError> {
        match self.guard.evaluate_demo_booking(&self.store, submission)? {
            Decision::Accepted { record } => {
                let stored = self.store.insert_booking(record)?;
                Ok(Decision::accepted(stored))
            }
            Decision::Rejected { rejection } => Ok(Decision::rejected(rejection)),
        }
    }

    /// Persist an accepted enrollment and bump the course counter.
    ///
    /// The existence check in the guard can race with a concurrent insert
    /// for the same (email, course). The store's uniqueness constraint
    /// settles it, and the loser gets `AlreadyEnrolled`.
    pub fn submit_course_enrollment(
        &self,
        submission: &EnrollmentSubmission,
    ) -> Result<Decision<CourseEnrollment>, CoreError> {
        let record = match self.guard.evaluate_course_enrollment(&self.store, submission)? {
            Decision::Accepted { record } => record,
            Decision::Rejected { rejection } => return Ok(Decision::rejected(rejection)),
        };

        let course_id = record.course_id;
        let stored = match self.store.insert_enrollment(record) {
            Ok(stored) => stored,
            Err(CoreError::Duplicate { .. }) => {
                warn!(%course_id, "enrollment lost insert race, already enrolled");
                return Ok(Decision::rejected(Rejection::on_field(
                    RejectReason::AlreadyEnrolled,
                    "email",
                )));
            }
            Err(e) => return Err(e),
        };

        let students = self.store.increment_students_enrolled(course_id)?;
        info!(enrollment_id = %stored.id, %course_id, students, "enrollment stored");
        Ok(Decision::accepted(stored))
    }

    pub fn submit_contact_inquiry(
        &self,
        submission: &InquirySubmission,
    ) -> Result<Decision<ContactInquiry>, CoreError> {
        match self.guard.evaluate_contact_inquiry(&self.store, submission)? {
            Decision::Accepted { record } => {
                let stored = self.store.insert_inquiry(record)?;
                Ok(Decision::accepted(stored))
            }
            Decision::Rejected { rejection } => Ok(Decision::rejected(rejection)),
        }
    }

    pub fn submit_project_request(
        &self,
        submission: &ProjectRequestSubmission,
    ) -> Result<Decision<ProjectRequest>, CoreError> {
        match self.guard.evaluate_project_request(&self.store, submission)? {
            Decision::Accepted { record } => {
                let stored = self.store.insert_project_request(record)?;
                info!(request_id = %stored.id, "project request stored");
                Ok(Decision::accepted(stored))
            }
            Decision::Rejected { rejection } => Ok(Decision::rejected(rejection)),
        }
    }
}
