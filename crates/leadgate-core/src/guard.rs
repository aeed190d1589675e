// ── Decision assembler ──
//
// Normalizer, then conflict checker, then pricing. Each pipeline stops at
// the first rejection. The guard only reads from the store; the caller
// persists whatever comes back accepted (see `Intake`).

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::GuardConfig;
use crate::conflict::{ConflictChecker, Verdict};
use crate::decision::Decision;
use crate::error::{CoreError, RejectReason, Rejection};
use crate::inquiry;
use crate::model::{
    BookingId, BookingStatus, BookingSubmission, DemoBooking, EnrollmentStatus,
    EnrollmentSubmission, InquiryStatus, InquirySubmission, NewEnrollment, NewInquiry,
    NewProjectRequest, Priority, ProjectRequestStatus, ProjectRequestSubmission,
};
use crate::normalize::{
    normalize_contact, normalize_country, normalize_email, normalize_project_phone, require_text,
};
use crate::pricing::{self, PricingCalculator};
use crate::sanitize::{clean_optional, clean_text};
use crate::store::{BookingQuery, CourseLookup, EnrollmentQuery, InquiryQuery, ProjectLookup};

const MAX_PROJECT_TITLE_CHARS: usize = 200;

/// Unwrap a `Result<T, Rejection>` or return it as a rejected decision.
macro_rules! accept_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(rejection) => return Ok(rejected(rejection)),
        }
    };
}

/// The booking and enrollment guard.
///
/// Stateless apart from its configuration and clock, so one instance can
/// serve any number of concurrent evaluations.
#[derive(Debug, Clone)]
pub struct Guard<C = SystemClock> {
    config: GuardConfig,
    pricing: PricingCalculator,
    clock: C,
}

impl Guard<SystemClock> {
    pub fn new(config: GuardConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Guard<SystemClock> {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl<C: Clock> Guard<C> {
    pub fn with_clock(config: GuardConfig, clock: C) -> Self {
        let pricing = PricingCalculator::from_config(&config);
        Self {
            config,
            pricing,
            clock,
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn pricing(&self) -> &PricingCalculator {
        &self.pricing
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Demo bookings ────────────────────────────────────────────────

    /// Decide whether a demo booking may be accepted.
    ///
    /// Order: contact normalization, honeypot, terms, attendee count, then
    /// date, slot capacity and per-email pending cap.
    pub fn evaluate_demo_booking<S>(
        &self,
        store: &S,
        submission: &BookingSubmission,
    ) -> Result<Decision<DemoBooking>, CoreError>
    where
        S: BookingQuery + ?Sized,
    {
        let now = self.clock.now();
        let today = now.date_naive();

        let contact = accept_or_return!(normalize_contact(&submission.contact));
        debug!(date = %submission.demo_date, slot = %submission.demo_time, "booking contact normalized");

        if inquiry::honeypot_tripped(submission.honeypot.as_deref()) {
            return Ok(rejected(Rejection::on_field(RejectReason::Spam, "honeypot")));
        }
        if !submission.terms_accepted {
            return Ok(rejected(Rejection::on_field(
                RejectReason::TermsNotAccepted,
                "terms_accepted",
            )));
        }
        let max_attendees = self.config.max_attendees;
        if !(1..=max_attendees).contains(&submission.number_of_attendees) {
            return Ok(rejected(
                Rejection::on_field(RejectReason::InvalidAttendeeCount, "number_of_attendees")
                    .with_message(format!(
                        "Number of attendees must be between 1 and {max_attendees}."
                    )),
            ));
        }

        let checker = ConflictChecker::new(&self.config);
        let verdict = checker.check_booking(
            store,
            &contact.email,
            submission.demo_date,
            submission.demo_time,
            today,
        )?;
        if let Verdict::Rejected(rejection) = verdict {
            return Ok(rejected(rejection));
        }

        let booking = DemoBooking {
            booking_id: BookingId::generate(),
            contact,
            job_title: clean_text(&submission.job_title),
            demo_date: submission.demo_date,
            demo_time: submission.demo_time,
            demo_title: clean_text(&submission.demo_title),
            service_type: submission.service_type,
            demo_message: clean_optional(submission.demo_message.as_deref()),
            status: BookingStatus::Pending,
            terms_accepted: true,
            number_of_attendees: submission.number_of_attendees,
            meeting_platform: submission.meeting_platform,
            created_at: now,
        };
        info!(
            booking_id = %booking.booking_id,
            date = %booking.demo_date,
            slot = %booking.demo_time,
            "demo booking accepted"
        );
        Ok(Decision::accepted(booking))
    }

    // ── Course enrollments ───────────────────────────────────────────

    /// Decide whether a course enrollment may be accepted, pricing it on
    /// success.
    ///
    /// A submission already marked paid with no amount is settled at the
    /// quoted total.
    pub fn evaluate_course_enrollment<S>(
        &self,
        store: &S,
        submission: &EnrollmentSubmission,
    ) -> Result<Decision<NewEnrollment>, CoreError>
    where
        S: EnrollmentQuery + CourseLookup + ?Sized,
    {
        let contact = accept_or_return!(normalize_contact(&submission.contact));
        let country = accept_or_return!(normalize_country(submission.country.as_deref()));
        debug!(course_id = %submission.course_id, "enrollment contact normalized");

        let checker = ConflictChecker::new(&self.config);
        let course = match checker.check_enrollment(store, &contact.email, submission.course_id)? {
            Verdict::Accepted(course) => course,
            Verdict::Rejected(rejection) => return Ok(rejected(rejection)),
        };

        let quote = self.pricing.quote(course.price);
        debug!(
            course_id = %course.id,
            price = %quote.base_price,
            total = %quote.total_amount,
            "enrollment priced"
        );

        let payment_status = submission.payment_status;
        let enrollment = NewEnrollment {
            contact,
            course_id: course.id,
            country,
            experience_level: submission.experience_level,
            learning_goals: clean_optional(submission.learning_goals.as_deref()),
            status: EnrollmentStatus::Pending,
            payment_status,
            amount_paid: pricing::settle_amount_paid(
                payment_status,
                submission.amount_paid,
                quote.total_amount,
            ),
            platform_fee: quote.platform_fee,
            tax_amount: quote.tax_amount,
            total_amount: quote.total_amount,
            enrolled_at: self.clock.now(),
        };
        info!(
            course_id = %enrollment.course_id,
            total = %enrollment.total_amount,
            payment_status = %enrollment.payment_status,
            "course enrollment accepted"
        );
        Ok(Decision::accepted(enrollment))
    }

    // ── Project requests ─────────────────────────────────────────────

    /// Decide whether a project request may be accepted.
    ///
    /// Fields are checked in form order: project, custom title,
    /// description, phone number, email.
    pub fn evaluate_project_request<S>(
        &self,
        store: &S,
        submission: &ProjectRequestSubmission,
    ) -> Result<Decision<NewProjectRequest>, CoreError>
    where
        S: ProjectLookup + ?Sized,
    {
        let checker = ConflictChecker::new(&self.config);
        let project = match checker.check_project(store, submission.project_id)? {
            Verdict::Accepted(project) => project,
            Verdict::Rejected(rejection) => return Ok(rejected(rejection)),
        };

        let custom_title = accept_or_return!(require_text(
            &submission.custom_title,
            "custom_title",
            Some(MAX_PROJECT_TITLE_CHARS)
        ));
        let description = accept_or_return!(require_text(&submission.description, "description", None));
        let phone_number = accept_or_return!(normalize_project_phone(&submission.phone_number));
        let email = accept_or_return!(normalize_email(&submission.email));

        let request = NewProjectRequest {
            project_id: project.map(|p| p.id),
            custom_title,
            description,
            phone_number,
            email,
            status: ProjectRequestStatus::Pending,
            created_at: self.clock.now(),
        };
        info!(
            project = %request.project_id.map_or_else(|| "custom".to_owned(), |id| id.to_string()),
            "project request accepted"
        );
        Ok(Decision::accepted(request))
    }

    // ── Contact inquiries ────────────────────────────────────────────

    /// Decide whether a contact inquiry may be accepted and classify it.
    ///
    /// Only the honeypot rejects. A rapid resubmission from the same
    /// session is accepted with status `spam`.
    pub fn evaluate_contact_inquiry<S>(
        &self,
        store: &S,
        submission: &InquirySubmission,
    ) -> Result<Decision<NewInquiry>, CoreError>
    where
        S: InquiryQuery + ?Sized,
    {
        if inquiry::honeypot_tripped(submission.honeypot.as_deref()) {
            return Ok(rejected(Rejection::on_field(RejectReason::Spam, "honeypot")));
        }

        let contact = accept_or_return!(normalize_contact(&submission.contact));
        let now = self.clock.now();

        let session_key = clean_optional(submission.session_key.as_deref());
        let mut status = InquiryStatus::New;
        if let Some(key) = session_key.as_deref() {
            if let Some(previous) = store.last_inquiry_at(key)? {
                if inquiry::within_spam_window(previous, now, self.config.spam_window) {
                    debug!(%previous, %now, "inquiry resubmitted inside spam window");
                    status = InquiryStatus::Spam;
                }
            }
        }

        let message = clean_text(&submission.message);
        let suspicious = inquiry::is_suspicious(&message);

        let record = NewInquiry {
            contact,
            department: submission.department,
            subject: clean_text(&submission.subject),
            message,
            newsletter_subscribed: submission.newsletter_subscribed,
            session_key,
            status,
            priority: Priority::default(),
            suspicious,
            created_at: now,
        };
        info!(
            department = %record.department,
            status = %record.status,
            suspicious,
            "contact inquiry accepted"
        );
        Ok(Decision::accepted(record))
    }
}

fn rejected<T>(rejection: Rejection) -> Decision<T> {
    warn!(
        reason = %rejection.reason,
        field = rejection.field.as_deref().unwrap_or("-"),
        "submission rejected"
    );
    Decision::rejected(rejection)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::{
        ContactInput, Course, CourseId, PaymentStatus, Project, ProjectCategory, ProjectId, TimeSlot,
    };
    use crate::store::{MemoryStore, RecordSink};
    use chrono::{Duration, NaiveDate};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 30).unwrap()
    }

    fn guard() -> Guard<Arc<FixedClock>> {
        Guard::with_clock(GuardConfig::default(), Arc::new(FixedClock::at_date(today())))
    }

    fn contact(email: &str) -> ContactInput {
        ContactInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: Some("+44 (20) 7946-0958".into()),
            company: Some("  Analytical Engines  ".into()),
        }
    }

    fn booking(email: &str) -> BookingSubmission {
        BookingSubmission {
            contact: contact(email),
            job_title: "CTO".into(),
            demo_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            demo_time: TimeSlot::T1000,
            demo_title: "Automation walkthrough".into(),
            service_type: None,
            demo_message: Some("   ".into()),
            terms_accepted: true,
            number_of_attendees: 3,
            meeting_platform: Default::default(),
            honeypot: None,
        }
    }

    #[test]
    fn accepted_booking_is_pending_and_normalized() {
        let store = MemoryStore::new();
        let decision = guard()
            .evaluate_demo_booking(&store, &booking("  Ada@Example.COM "))
            .unwrap();
        let record = decision.into_record().unwrap();
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.contact.email.as_str(), "ada@example.com");
        assert_eq!(record.contact.phone.unwrap().as_str(), "+442079460958");
        assert_eq!(record.contact.company.as_deref(), Some("Analytical Engines"));
        assert_eq!(record.demo_message, None);
    }

    #[test]
    fn name_is_checked_before_terms() {
        let mut sub = booking("ada@example.com");
        sub.contact.first_name = "A".into();
        sub.terms_accepted = false;
        let decision = guard().evaluate_demo_booking(&MemoryStore::new(), &sub).unwrap();
        assert_eq!(decision.reason(), Some(RejectReason::InvalidName));
    }

    #[test]
    fn terms_and_attendees_are_enforced() {
        let store = MemoryStore::new();
        let mut sub = booking("ada@example.com");
        sub.terms_accepted = false;
        assert_eq!(
            guard().evaluate_demo_booking(&store, &sub).unwrap().reason(),
            Some(RejectReason::TermsNotAccepted)
        );

        for count in [0, 51] {
            let mut sub = booking("ada@example.com");
            sub.number_of_attendees = count;
            assert_eq!(
                guard().evaluate_demo_booking(&store, &sub).unwrap().reason(),
                Some(RejectReason::InvalidAttendeeCount)
            );
        }
    }

    #[test]
    fn honeypot_rejects_booking_as_spam() {
        let mut sub = booking("ada@example.com");
        sub.honeypot = Some("http://spam.example".into());
        let decision = guard().evaluate_demo_booking(&MemoryStore::new(), &sub).unwrap();
        assert_eq!(decision.reason(), Some(RejectReason::Spam));
    }

    #[test]
    fn invalid_date_wins_over_full_slot() {
        let store = MemoryStore::new();
        let g = guard();
        let mut sub = booking("ada@example.com");
        sub.demo_date = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        let decision = g.evaluate_demo_booking(&store, &sub).unwrap();
        assert_eq!(decision.reason(), Some(RejectReason::InvalidDate));
    }

    #[test]
    fn enrollment_is_priced_at_creation() {
        let store = MemoryStore::new();
        store.add_course(Course {
            id: CourseId(5),
            title: "Rust".into(),
            price: "199.00".parse().unwrap(),
            is_active: true,
            students_enrolled: 0,
        });
        let sub = EnrollmentSubmission {
            contact: contact("bob@example.com"),
            course_id: CourseId(5),
            country: Some(" ca ".into()),
            experience_level: Default::default(),
            learning_goals: None,
            payment_status: PaymentStatus::Pending,
            amount_paid: None,
        };
        let record = guard()
            .evaluate_course_enrollment(&store, &sub)
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(record.tax_amount, "20.90".parse().unwrap());
        assert_eq!(record.total_amount, "229.90".parse().unwrap());
        assert_eq!(record.country.as_deref(), Some("CA"));
        assert_eq!(record.amount_paid, None);
    }

    #[test]
    fn inactive_or_missing_course_is_unavailable() {
        let store = MemoryStore::new();
        store.add_course(Course {
            id: CourseId(1),
            title: "Retired".into(),
            price: "10".parse().unwrap(),
            is_active: false,
            students_enrolled: 0,
        });
        for id in [1, 2] {
            let sub = EnrollmentSubmission {
                contact: contact("bob@example.com"),
                course_id: CourseId(id),
                country: None,
                experience_level: Default::default(),
                learning_goals: None,
                payment_status: PaymentStatus::Pending,
                amount_paid: None,
            };
            let decision = guard().evaluate_course_enrollment(&store, &sub).unwrap();
            assert_eq!(decision.reason(), Some(RejectReason::CourseUnavailable));
        }
    }

    #[test]
    fn unknown_country_is_rejected_before_course_lookup() {
        let sub = EnrollmentSubmission {
            contact: contact("bob@example.com"),
            course_id: CourseId(404),
            country: Some("Narnia".into()),
            experience_level: Default::default(),
            learning_goals: None,
            payment_status: PaymentStatus::Pending,
            amount_paid: None,
        };
        let decision = guard().evaluate_course_enrollment(&MemoryStore::new(), &sub).unwrap();
        let rejection = decision.rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::InvalidCountry);
        assert_eq!(rejection.field.as_deref(), Some("country"));
    }

    fn project_sub(project_id: Option<u64>) -> ProjectRequestSubmission {
        ProjectRequestSubmission {
            project_id: project_id.map(ProjectId),
            custom_title: "  Clinic booking app ".into(),
            description: "Appointments with SMS reminders".into(),
            phone_number: "+254 712 345 678".into(),
            email: " Dev@Example.com ".into(),
        }
    }

    fn project_store() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, is_available) in [(1, true), (2, false)] {
            store.add_project(Project {
                id: ProjectId(id),
                title: format!("Project {id}"),
                description: String::new(),
                category: ProjectCategory::Web,
                price: "1500.00".parse().unwrap(),
                documentation_price: "500.00".parse().unwrap(),
                coding_price: "1000.00".parse().unwrap(),
                is_available,
            });
        }
        store
    }

    #[test]
    fn project_request_is_normalized_and_pending() {
        let store = project_store();
        for project_id in [None, Some(1)] {
            let record = guard()
                .evaluate_project_request(&store, &project_sub(project_id))
                .unwrap()
                .into_record()
                .unwrap();
            assert_eq!(record.project_id, project_id.map(ProjectId));
            assert_eq!(record.custom_title, "Clinic booking app");
            assert_eq!(record.phone_number, "+254712345678");
            assert_eq!(record.email.as_str(), "dev@example.com");
            assert_eq!(record.status, ProjectRequestStatus::Pending);
        }
    }

    #[test]
    fn unavailable_or_unknown_project_is_rejected() {
        let store = project_store();
        for id in [2, 99] {
            let decision = guard()
                .evaluate_project_request(&store, &project_sub(Some(id)))
                .unwrap();
            assert_eq!(decision.reason(), Some(RejectReason::ProjectUnavailable));
        }
    }

    #[test]
    fn project_fields_fail_in_form_order() {
        let store = project_store();
        let mut sub = project_sub(None);
        sub.custom_title = " ".into();
        sub.phone_number = "123".into();
        let rejection = guard().evaluate_project_request(&store, &sub).unwrap();
        assert_eq!(rejection.rejection().unwrap().field.as_deref(), Some("custom_title"));

        let mut sub = project_sub(None);
        sub.phone_number = "123".into();
        sub.email = "broken".into();
        let rejection = guard().evaluate_project_request(&store, &sub).unwrap();
        assert_eq!(rejection.reason(), Some(RejectReason::InvalidPhone));

        let mut sub = project_sub(None);
        sub.custom_title = "t".repeat(201);
        let rejection = guard().evaluate_project_request(&store, &sub).unwrap();
        assert_eq!(rejection.reason(), Some(RejectReason::FieldTooLong));
    }

    fn inquiry_sub(session: Option<&str>, message: &str) -> InquirySubmission {
        InquirySubmission {
            contact: contact("carol@example.com"),
            department: Default::default(),
            subject: "Pricing".into(),
            message: message.into(),
            newsletter_subscribed: true,
            session_key: session.map(str::to_owned),
            honeypot: None,
        }
    }

    #[test]
    fn rapid_inquiry_from_same_session_is_marked_spam() {
        let clock = Arc::new(FixedClock::at_date(today()));
        let g = Guard::with_clock(GuardConfig::default(), Arc::clone(&clock));
        let store = MemoryStore::new();

        let first = g
            .evaluate_contact_inquiry(&store, &inquiry_sub(Some("s1"), "Hello"))
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(first.status, InquiryStatus::New);
        store.insert_inquiry(first).unwrap();

        clock.advance(Duration::seconds(2));
        let second = g
            .evaluate_contact_inquiry(&store, &inquiry_sub(Some("s1"), "Hello again"))
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(second.status, InquiryStatus::Spam);

        let other_session = g
            .evaluate_contact_inquiry(&store, &inquiry_sub(Some("s2"), "Hi"))
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(other_session.status, InquiryStatus::New);

        clock.advance(Duration::seconds(10));
        let later = g
            .evaluate_contact_inquiry(&store, &inquiry_sub(Some("s1"), "Later"))
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(later.status, InquiryStatus::New);
    }

    #[test]
    fn suspicious_message_is_flagged_not_rejected() {
        let decision = guard()
            .evaluate_contact_inquiry(&MemoryStore::new(), &inquiry_sub(None, "Click here: www.x.io"))
            .unwrap();
        let record = decision.into_record().unwrap();
        assert!(record.suspicious);
        assert_eq!(record.status, InquiryStatus::New);
    }

    #[test]
    fn inquiry_honeypot_is_checked_first() {
        let mut sub = inquiry_sub(None, "Hi");
        sub.contact.email = "not-an-email".into();
        sub.honeypot = Some("filled".into());
        let decision = guard().evaluate_contact_inquiry(&MemoryStore::new(), &sub).unwrap();
        assert_eq!(decision.reason(), Some(RejectReason::Spam));
    }
}
