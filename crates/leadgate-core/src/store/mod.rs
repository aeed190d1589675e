// ── Collaborator interfaces ──
//
// The guard reads persisted state through the query traits and never
// writes. Persistence belongs to the caller and goes through `RecordSink`.
// Every method can fail with a `CoreError` so a database-backed adapter
// can report backend trouble; such failures are never rejections.

mod collection;
mod memory;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CoreError;
use crate::model::{
    ContactInquiry, CourseEnrollment, CourseId, CourseRef, DemoBooking, EmailAddress,
    NewEnrollment, NewInquiry, NewProjectRequest, ProjectId, ProjectRef, ProjectRequest,
    TimeSlot,
};

pub use memory::{MemoryStore, Snapshot};

/// Read access to existing demo bookings.
pub trait BookingQuery {
    /// Active bookings occupying exactly this (date, slot).
    fn count_active_in_slot(&self, date: NaiveDate, slot: TimeSlot) -> Result<usize, CoreError>;

    /// Active bookings for `email` with a demo date on or after `from`.
    fn count_active_for_email(
        &self,
        email: &EmailAddress,
        from: NaiveDate,
    ) -> Result<usize, CoreError>;
}

/// Read access to existing enrollments.
pub trait EnrollmentQuery {
    fn enrollment_exists(&self, email: &EmailAddress, course_id: CourseId)
    -> Result<bool, CoreError>;
}

/// Course catalog lookup.
pub trait CourseLookup {
    fn course(&self, id: CourseId) -> Result<Option<CourseRef>, CoreError>;
}

/// Project catalog lookup.
pub trait ProjectLookup {
    fn project(&self, id: ProjectId) -> Result<Option<ProjectRef>, CoreError>;
}

/// Read access to earlier contact inquiries.
pub trait InquiryQuery {
    /// When `session_key` last submitted an inquiry, if ever.
    fn last_inquiry_at(&self, session_key: &str) -> Result<Option<DateTime<Utc>>, CoreError>;
}

/// Writes accepted records.
pub trait RecordSink {
    fn insert_booking(&self, booking: DemoBooking) -> Result<DemoBooking, CoreError>;

    /// Must fail with [`CoreError::Duplicate`] when an enrollment for the
    /// same (email, course) already exists, however it got there.
    fn insert_enrollment(&self, enrollment: NewEnrollment) -> Result<CourseEnrollment, CoreError>;

    fn insert_inquiry(&self, inquiry: NewInquiry) -> Result<ContactInquiry, CoreError>;

    fn insert_project_request(
        &self,
        request: NewProjectRequest,
    ) -> Result<ProjectRequest, CoreError>;

    /// Bump the course's enrolled-student counter (and any aggregate
    /// counters) as a single atomic operation. Returns the new count.
    fn increment_students_enrolled(&self, course_id: CourseId) -> Result<u64, CoreError>;
}

/// Everything the guard needs to read.
pub trait GuardStore:
    BookingQuery + EnrollmentQuery + CourseLookup + ProjectLookup + InquiryQuery
{
}

impl<T> GuardStore for T where
    T: BookingQuery + EnrollmentQuery + CourseLookup + ProjectLookup + InquiryQuery + ?Sized
{
}

/// A store the intake pipeline can both read and write.
pub trait RecordStore: GuardStore + RecordSink {}

impl<T> RecordStore for T where T: GuardStore + RecordSink + ?Sized {}
