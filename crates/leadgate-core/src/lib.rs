//! Booking and enrollment guard for a lead-capture backend.
//!
//! Decides whether a demo-booking, course-enrollment, contact-inquiry, or
//! project-request submission may be accepted given the records already
//! on file:
//!
//! - **Input normalization** ([`normalize`]): trims and lower-cases email,
//!   compacts phone numbers, validates names. Pure functions.
//!
//! - **[`ConflictChecker`]**: date, slot-capacity, and pending-cap rules
//!   for bookings; course availability and (email, course) uniqueness for
//!   enrollments; project availability for project requests. Reads go
//!   through the collaborator traits in [`store`].
//!
//! - **[`PricingCalculator`]**: platform fee and tax on top of the course
//!   price, rounded to cents once at creation.
//!
//! - **[`Guard`]**: the decision assembler. Runs the stages in order,
//!   stops at the first failure, and returns a [`Decision`].
//!
//! - **[`Intake`]**: couples a guard to a writable store: evaluate,
//!   persist, bump counters. Resolves the enrollment insert race through
//!   the store's uniqueness constraint.
//!
//! [`MemoryStore`] is a concurrent in-process implementation of every
//! store trait, seedable from a serde [`Snapshot`].

pub mod clock;
pub mod config;
pub mod conflict;
pub mod decision;
pub mod error;
pub mod guard;
pub mod inquiry;
pub mod intake;
pub mod model;
pub mod normalize;
pub mod pricing;
pub mod sanitize;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::GuardConfig;
pub use conflict::{ConflictChecker, Verdict};
pub use decision::Decision;
pub use error::{CoreError, RejectReason, Rejection};
pub use guard::Guard;
pub use intake::Intake;
pub use pricing::{PriceBreakdown, PricingCalculator};
pub use store::{
    BookingQuery, CourseLookup, EnrollmentQuery, GuardStore, InquiryQuery, MemoryStore,
    ProjectLookup, RecordSink, RecordStore, Snapshot,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BookingId, BookingStatus, BookingSubmission, ContactDetails, ContactInput, ContactInquiry,
    Course, CourseEnrollment, CourseId, CourseRef, CourseStat, DemoBooking, Department,
    EmailAddress, EnrollmentId, EnrollmentStatus, EnrollmentSubmission, ExperienceLevel,
    InquiryId, InquiryStatus, InquirySubmission, MeetingPlatform, NewEnrollment, NewInquiry,
    NewProjectRequest, PaymentStatus, PhoneNumber, Priority, Project, ProjectCategory, ProjectId,
    ProjectRef, ProjectRequest, ProjectRequestId, ProjectRequestStatus, ProjectRequestSubmission,
    ServiceType, TimeSlot,
};
