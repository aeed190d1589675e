// ── Domain model ──
//
// Submissions (raw form input), records (what the store keeps), and the
// small identity types both are built from.

pub mod booking;
pub mod contact;
pub mod course;
pub mod enrollment;
pub mod inquiry;
pub mod project;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use leadgate_core::model::*` gives you everything.

// Contact identity
pub use contact::{ContactDetails, ContactInput, EmailAddress, PhoneNumber};

// Demo bookings
pub use booking::{
    BookingId, BookingStatus, BookingSubmission, DemoBooking, MeetingPlatform, ServiceType,
    TimeSlot,
};

// Courses
pub use course::{Course, CourseId, CourseRef, CourseStat};

// Enrollments
pub use enrollment::{
    CourseEnrollment, EnrollmentId, EnrollmentKey, EnrollmentStatus, EnrollmentSubmission,
    ExperienceLevel, NewEnrollment, PaymentStatus,
};

// Contact inquiries
pub use inquiry::{
    ContactInquiry, Department, InquiryId, InquiryStatus, InquirySubmission, NewInquiry, Priority,
};

// Project requests
pub use project::{
    NewProjectRequest, Project, ProjectCategory, ProjectId, ProjectRef, ProjectRequest,
    ProjectRequestId, ProjectRequestStatus, ProjectRequestSubmission,
};
