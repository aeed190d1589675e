// ── In-memory reference store ──
//
// Implements every collaborator trait over `RecordCollection`s. Counters
// are atomics, so enrollments landing concurrently never lose an update.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::collection::RecordCollection;
use super::{BookingQuery, CourseLookup, EnrollmentQuery, InquiryQuery, ProjectLookup, RecordSink};
use crate::error::CoreError;
use crate::model::{
    BookingId, ContactInquiry, Course, CourseEnrollment, CourseId, CourseRef, CourseStat,
    DemoBooking, EmailAddress, EnrollmentId, EnrollmentKey, InquiryId, NewEnrollment, NewInquiry,
    NewProjectRequest, Project, ProjectId, ProjectRef, ProjectRequest, ProjectRequestId, TimeSlot,
};

/// Serializable contents of a [`MemoryStore`].
///
/// This is the records file the CLI reads. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub bookings: Vec<DemoBooking>,
    #[serde(default)]
    pub enrollments: Vec<CourseEnrollment>,
    #[serde(default)]
    pub inquiries: Vec<ContactInquiry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_requests: Vec<ProjectRequest>,
    /// Catalog-wide counters. Derived from the courses when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<CourseStat>,
}

/// A course plus its live enrollment counter.
struct CourseEntry {
    course: Course,
    students_enrolled: AtomicU64,
}

impl CourseEntry {
    fn new(course: Course) -> Self {
        let students_enrolled = AtomicU64::new(course.students_enrolled);
        Self {
            course,
            students_enrolled,
        }
    }

    fn to_course(&self) -> Course {
        Course {
            students_enrolled: self.students_enrolled.load(Ordering::Acquire),
            ..self.course.clone()
        }
    }
}

/// Thread-safe in-process store.
pub struct MemoryStore {
    courses: RecordCollection<CourseId, CourseEntry>,
    bookings: RecordCollection<BookingId, DemoBooking>,
    enrollments: RecordCollection<EnrollmentKey, CourseEnrollment>,
    inquiries: RecordCollection<InquiryId, ContactInquiry>,
    projects: RecordCollection<ProjectId, Project>,
    project_requests: RecordCollection<ProjectRequestId, ProjectRequest>,

    /// Latest inquiry time per session key.
    last_inquiry: DashMap<String, DateTime<Utc>>,

    next_enrollment_id: AtomicU64,
    next_inquiry_id: AtomicU64,
    next_project_request_id: AtomicU64,
    total_students: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            courses: RecordCollection::new(),
            bookings: RecordCollection::new(),
            enrollments: RecordCollection::new(),
            inquiries: RecordCollection::new(),
            projects: RecordCollection::new(),
            project_requests: RecordCollection::new(),
            last_inquiry: DashMap::new(),
            next_enrollment_id: AtomicU64::new(1),
            next_inquiry_id: AtomicU64::new(1),
            next_project_request_id: AtomicU64::new(1),
            total_students: AtomicU64::new(0),
        }
    }

    /// Seed a store from a snapshot. Fails if the snapshot holds two
    /// bookings with the same id, two enrollments for the same
    /// (email, course), or an id at the top of its range.
    ///
    /// Enrollments marked paid with no amount on file are settled at
    /// their total on the way in.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, CoreError> {
        let store = Self::new();

        let derived_students: u64 = snapshot.courses.iter().map(|c| c.students_enrolled).sum();
        let total_students = snapshot
            .stats
            .map_or(derived_students, |s| s.total_students);
        store.total_students.store(total_students, Ordering::Release);

        for course in snapshot.courses {
            store.add_course(course);
        }
        for project in snapshot.projects {
            store.add_project(project);
        }
        for booking in snapshot.bookings {
            let id = booking.booking_id;
            if store.bookings.insert_unique(id, booking).is_err() {
                return Err(CoreError::Duplicate {
                    entity_type: "booking".into(),
                    key: id.to_string(),
                });
            }
        }

        let mut max_enrollment_id = 0;
        for mut enrollment in snapshot.enrollments {
            max_enrollment_id = max_enrollment_id.max(enrollment.id.0);
            enrollment.set_payment_status(enrollment.payment_status);
            let key = enrollment.key();
            if store.enrollments.insert_unique(key.clone(), enrollment).is_err() {
                return Err(CoreError::Duplicate {
                    entity_type: "enrollment".into(),
                    key: key.to_string(),
                });
            }
        }
        store
            .next_enrollment_id
            .store(next_id(max_enrollment_id, "enrollment")?, Ordering::Release);

        let mut max_inquiry_id = 0;
        for inquiry in snapshot.inquiries {
            max_inquiry_id = max_inquiry_id.max(inquiry.id.0);
            store.record_session(&inquiry);
            store.inquiries.upsert(inquiry.id, inquiry);
        }
        store
            .next_inquiry_id
            .store(next_id(max_inquiry_id, "inquiry")?, Ordering::Release);

        let mut max_request_id = 0;
        for request in snapshot.project_requests {
            max_request_id = max_request_id.max(request.id.0);
            store.project_requests.upsert(request.id, request);
        }
        store
            .next_project_request_id
            .store(next_id(max_request_id, "project request")?, Ordering::Release);

        debug!(
            courses = store.courses.len(),
            bookings = store.bookings.len(),
            enrollments = store.enrollments.len(),
            inquiries = store.inquiries.len(),
            projects = store.projects.len(),
            project_requests = store.project_requests.len(),
            "store seeded from snapshot"
        );
        Ok(store)
    }

    /// Export the current contents, sorted for stable output.
    pub fn snapshot(&self) -> Snapshot {
        let mut courses: Vec<Course> = self.courses.values().iter().map(|c| c.to_course()).collect();
        courses.sort_by_key(|c| c.id);

        let mut bookings = cloned(self.bookings.values());
        bookings.sort_by(|a, b| {
            (a.demo_date, a.demo_time, a.created_at).cmp(&(b.demo_date, b.demo_time, b.created_at))
        });

        let mut enrollments = cloned(self.enrollments.values());
        enrollments.sort_by_key(|e| e.id);

        let mut inquiries = cloned(self.inquiries.values());
        inquiries.sort_by_key(|i| i.id);

        let mut projects = cloned(self.projects.values());
        projects.sort_by_key(|p| p.id);

        let mut project_requests = cloned(self.project_requests.values());
        project_requests.sort_by_key(|r| r.id);

        Snapshot {
            courses,
            bookings,
            enrollments,
            inquiries,
            projects,
            project_requests,
            stats: Some(self.course_stats()),
        }
    }

    /// Add or replace a catalog course.
    pub fn add_course(&self, course: Course) {
        self.courses.upsert(course.id, CourseEntry::new(course));
    }

    /// Current view of a course, including its live counter.
    pub fn get_course(&self, id: CourseId) -> Option<Course> {
        self.courses.get(&id).map(|entry| entry.to_course())
    }

    /// Add or replace a catalog project.
    pub fn add_project(&self, project: Project) {
        self.projects.upsert(project.id, project);
    }

    pub fn course_stats(&self) -> CourseStat {
        CourseStat {
            total_courses: self.courses.len() as u64,
            total_students: self.total_students.load(Ordering::Acquire),
        }
    }

    pub fn bookings_on(&self, date: NaiveDate) -> Vec<DemoBooking> {
        let mut found: Vec<DemoBooking> = cloned(self.bookings.values())
            .into_iter()
            .filter(|b| b.demo_date == date)
            .collect();
        found.sort_by_key(|b| (b.demo_time, b.created_at));
        found
    }

    pub fn enrollment(&self, email: &EmailAddress, course_id: CourseId) -> Option<CourseEnrollment> {
        let key = EnrollmentKey {
            email: email.clone(),
            course_id,
        };
        self.enrollments.get(&key).map(Arc::unwrap_or_clone)
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    pub fn inquiry_count(&self) -> usize {
        self.inquiries.len()
    }

    pub fn project_request_count(&self) -> usize {
        self.project_requests.len()
    }

    /// Sum of mutation counters across collections. Changes whenever any
    /// record is written.
    pub fn version(&self) -> u64 {
        self.courses.version()
            + self.bookings.version()
            + self.enrollments.version()
            + self.inquiries.version()
            + self.projects.version()
            + self.project_requests.version()
    }

    fn record_session(&self, inquiry: &ContactInquiry) {
        let Some(session) = inquiry.inquiry.session_key.as_deref() else {
            return;
        };
        let at = inquiry.inquiry.created_at;
        self.last_inquiry
            .entry(session.to_owned())
            .and_modify(|last| {
                if at > *last {
                    *last = at;
                }
            })
            .or_insert(at);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The id after the highest one seen. Fails instead of wrapping.
fn next_id(max_seen: u64, entity: &str) -> Result<u64, CoreError> {
    max_seen.checked_add(1).ok_or_else(|| CoreError::Store {
        message: format!("{entity} id space exhausted at {max_seen}"),
    })
}

fn cloned<T: Clone>(records: Vec<Arc<T>>) -> Vec<T> {
    records.into_iter().map(Arc::unwrap_or_clone).collect()
}

// ── Collaborator trait impls ────────────────────────────────────────

impl BookingQuery for MemoryStore {
    fn count_active_in_slot(&self, date: NaiveDate, slot: TimeSlot) -> Result<usize, CoreError> {
        Ok(self.bookings.count_where(|b| {
            b.status.is_active() && b.demo_date == date && b.demo_time == slot
        }))
    }

    fn count_active_for_email(
        &self,
        email: &EmailAddress,
        from: NaiveDate,
    ) -> Result<usize, CoreError> {
        Ok(self.bookings.count_where(|b| {
            b.status.is_active() && b.contact.email == *email && b.demo_date >= from
        }))
    }
}

impl EnrollmentQuery for MemoryStore {
    fn enrollment_exists(
        &self,
        email: &EmailAddress,
        course_id: CourseId,
    ) -> Result<bool, CoreError> {
        Ok(self.enrollments.contains(&EnrollmentKey {
            email: email.clone(),
            course_id,
        }))
    }
}

impl CourseLookup for MemoryStore {
    fn course(&self, id: CourseId) -> Result<Option<CourseRef>, CoreError> {
        Ok(self.courses.get(&id).map(|entry| entry.course.course_ref()))
    }
}

impl ProjectLookup for MemoryStore {
    fn project(&self, id: ProjectId) -> Result<Option<ProjectRef>, CoreError> {
        Ok(self.projects.get(&id).map(|project| project.project_ref()))
    }
}

impl InquiryQuery for MemoryStore {
    fn last_inquiry_at(&self, session_key: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(self.last_inquiry.get(session_key).map(|at| *at))
    }
}

impl RecordSink for MemoryStore {
    fn insert_booking(&self, booking: DemoBooking) -> Result<DemoBooking, CoreError> {
        let id = booking.booking_id;
        match self.bookings.insert_unique(id, booking) {
            Ok(stored) => Ok(DemoBooking::clone(&stored)),
            Err(_) => Err(CoreError::Duplicate {
                entity_type: "booking".into(),
                key: id.to_string(),
            }),
        }
    }

    fn insert_enrollment(&self, enrollment: NewEnrollment) -> Result<CourseEnrollment, CoreError> {
        let key = enrollment.key();
        if self.enrollments.contains(&key) {
            return Err(CoreError::Duplicate {
                entity_type: "enrollment".into(),
                key: key.to_string(),
            });
        }
        let id = EnrollmentId(self.next_enrollment_id.fetch_add(1, Ordering::AcqRel));
        match self.enrollments.insert_unique(key.clone(), enrollment.with_id(id)) {
            Ok(stored) => Ok(CourseEnrollment::clone(&stored)),
            // Lost a race to a concurrent insert for the same key.
            Err(_) => Err(CoreError::Duplicate {
                entity_type: "enrollment".into(),
                key: key.to_string(),
            }),
        }
    }

    fn insert_inquiry(&self, inquiry: NewInquiry) -> Result<ContactInquiry, CoreError> {
        let id = InquiryId(self.next_inquiry_id.fetch_add(1, Ordering::AcqRel));
        let record = inquiry.with_id(id);
        self.record_session(&record);
        self.inquiries.upsert(id, record.clone());
        Ok(record)
    }

    fn insert_project_request(
        &self,
        request: NewProjectRequest,
    ) -> Result<ProjectRequest, CoreError> {
        let id = ProjectRequestId(self.next_project_request_id.fetch_add(1, Ordering::AcqRel));
        let record = request.with_id(id);
        self.project_requests.upsert(id, record.clone());
        Ok(record)
    }

    fn increment_students_enrolled(&self, course_id: CourseId) -> Result<u64, CoreError> {
        let entry = self.courses.get(&course_id).ok_or_else(|| CoreError::NotFound {
            entity_type: "course".into(),
            identifier: course_id.to_string(),
        })?;
        let count = entry.students_enrolled.fetch_add(1, Ordering::AcqRel) + 1;
        self.total_students.fetch_add(1, Ordering::AcqRel);
        Ok(count)
    }
}
