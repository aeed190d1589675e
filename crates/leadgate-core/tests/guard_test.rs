#![allow(clippy::unwrap_used)]
// End-to-end tests for the guard and intake pipeline against `MemoryStore`.

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;

use leadgate_core::{
    BookingStatus, BookingSubmission, Course, CourseId, Decision, EnrollmentSubmission,
    FixedClock, Guard, GuardConfig, Intake, MemoryStore, PaymentStatus, ProjectId,
    ProjectRequestStatus, ProjectRequestSubmission, RejectReason, Snapshot,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// A Friday.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 30).unwrap()
}

fn guard() -> Guard<Arc<FixedClock>> {
    Guard::with_clock(GuardConfig::default(), Arc::new(FixedClock::at_date(today())))
}

fn intake(store: MemoryStore) -> Intake<MemoryStore, Arc<FixedClock>> {
    Intake::new(guard(), store)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn booking(email: &str, date: &str, slot: &str) -> BookingSubmission {
    serde_json::from_value(json!({
        "first_name": "Alice",
        "last_name": "Smith-Jones",
        "email": email,
        "phone": "+1 (555) 010-0000",
        "company": "Acme",
        "demo_date": date,
        "demo_time": slot,
        "terms_accepted": true,
        "number_of_attendees": 2,
    }))
    .unwrap()
}

fn enrollment(email: &str, course_id: u64) -> EnrollmentSubmission {
    serde_json::from_value(json!({
        "first_name": "Bob",
        "last_name": "Builder",
        "email": email,
        "course_id": course_id,
        "experience_level": "intermediate",
        "learning_goals": "Ship a CLI",
    }))
    .unwrap()
}

fn course(id: u64, price: &str) -> Course {
    Course {
        id: CourseId(id),
        title: format!("Course {id}"),
        price: dec(price),
        is_active: true,
        students_enrolled: 0,
    }
}

fn store_with_courses(courses: &[Course]) -> MemoryStore {
    MemoryStore::from_snapshot(Snapshot {
        courses: courses.to_vec(),
        ..Snapshot::default()
    })
    .unwrap()
}

// ── Booking properties ──────────────────────────────────────────────

#[test]
fn test_third_booking_in_full_slot_is_rejected() {
    let intake = intake(MemoryStore::new());
    for email in ["one@example.com", "two@example.com"] {
        let decision = intake
            .submit_demo_booking(&booking(email, "2025-06-02", "10:00"))
            .unwrap();
        assert!(decision.is_accepted(), "{decision:?}");
    }

    let third = intake
        .submit_demo_booking(&booking("three@example.com", "2025-06-02", "10:00"))
        .unwrap();
    assert_eq!(third.reason(), Some(RejectReason::SlotFull));
    let rejection = third.rejection().unwrap();
    assert_eq!(rejection.field.as_deref(), Some("demo_time"));
    assert!(rejection.message.contains("10:00"));

    let other_slot = intake
        .submit_demo_booking(&booking("three@example.com", "2025-06-02", "10:30"))
        .unwrap();
    assert!(other_slot.is_accepted());
}

#[test]
fn test_cancelled_bookings_free_the_slot() {
    let store = MemoryStore::new();
    let intake = intake(store);
    for email in ["one@example.com", "two@example.com"] {
        intake
            .submit_demo_booking(&booking(email, "2025-06-02", "10:00"))
            .unwrap();
    }
    let mut snapshot = intake.store().snapshot();
    snapshot.bookings[0].status = BookingStatus::Cancelled;

    let intake = self::intake(MemoryStore::from_snapshot(snapshot).unwrap());
    let decision = intake
        .submit_demo_booking(&booking("three@example.com", "2025-06-02", "10:00"))
        .unwrap();
    assert!(decision.is_accepted());
}

#[test]
fn test_fourth_pending_booking_for_same_email_is_rejected() {
    let intake = intake(MemoryStore::new());
    for date in ["2025-06-02", "2025-06-03", "2025-06-04"] {
        let decision = intake
            .submit_demo_booking(&booking("alice@example.com", date, "09:00"))
            .unwrap();
        assert!(decision.is_accepted());
    }

    let fourth = intake
        .submit_demo_booking(&booking("ALICE@example.com ", "2025-06-05", "11:00"))
        .unwrap();
    assert_eq!(fourth.reason(), Some(RejectReason::TooManyPending));
    assert_eq!(intake.store().booking_count(), 3);
}

#[test]
fn test_past_bookings_do_not_count_toward_pending_cap() {
    let snapshot: Snapshot = serde_json::from_value(json!({
        "bookings": [
            {"first_name": "Alice", "last_name": "Smith", "email": "alice@example.com",
             "demo_date": "2025-05-01", "demo_time": "09:00"},
            {"first_name": "Alice", "last_name": "Smith", "email": "alice@example.com",
             "demo_date": "2025-05-02", "demo_time": "09:00"},
            {"first_name": "Alice", "last_name": "Smith", "email": "alice@example.com",
             "demo_date": "2025-06-02", "demo_time": "09:00"},
        ]
    }))
    .unwrap();
    let intake = intake(MemoryStore::from_snapshot(snapshot).unwrap());
    let decision = intake
        .submit_demo_booking(&booking("alice@example.com", "2025-06-03", "09:00"))
        .unwrap();
    assert!(decision.is_accepted());
}

#[test]
fn test_saturday_booking_is_invalid_date() {
    let decision = guard()
        .evaluate_demo_booking(
            &MemoryStore::new(),
            &booking("sat@example.com", "2025-06-07", "10:00"),
        )
        .unwrap();
    assert_eq!(decision.reason(), Some(RejectReason::InvalidDate));
}

#[test]
fn test_date_rules_run_before_slot_capacity() {
    let intake = intake(MemoryStore::new());
    // Today is never bookable, whatever the slot holds.
    let decision = intake
        .submit_demo_booking(&booking("x@example.com", "2025-05-30", "10:00"))
        .unwrap();
    assert_eq!(decision.reason(), Some(RejectReason::InvalidDate));
}

#[test]
fn test_invalid_contact_fields_are_rejected_in_form_order() {
    let g = guard();
    let store = MemoryStore::new();

    let mut sub = booking("not-an-email", "2025-06-02", "10:00");
    sub.contact.phone = Some("abc".into());
    let decision = g.evaluate_demo_booking(&store, &sub).unwrap();
    assert_eq!(decision.reason(), Some(RejectReason::InvalidEmail));

    let mut sub = booking("ok@example.com", "2025-06-02", "10:00");
    sub.contact.phone = Some("0123".into());
    let decision = g.evaluate_demo_booking(&store, &sub).unwrap();
    assert_eq!(decision.reason(), Some(RejectReason::InvalidPhone));

    let mut sub = booking("ok@example.com", "2025-06-02", "10:00");
    sub.contact.last_name = "O'Brien".into();
    let decision = g.evaluate_demo_booking(&store, &sub).unwrap();
    assert_eq!(decision.reason(), Some(RejectReason::InvalidName));
}

// ── Enrollment properties ───────────────────────────────────────────

#[test]
fn test_second_enrollment_for_same_pair_is_already_enrolled() {
    let intake = intake(store_with_courses(&[course(5, "199.00")]));

    let first = intake
        .submit_course_enrollment(&enrollment("bob@example.com", 5))
        .unwrap();
    let record = first.into_record().unwrap();
    assert_eq!(record.tax_amount, dec("20.90"));
    assert_eq!(record.total_amount, dec("229.90"));
    assert_eq!(record.platform_fee, dec("10.00"));

    let second = intake
        .submit_course_enrollment(&enrollment("Bob@Example.com", 5))
        .unwrap();
    assert_eq!(second.reason(), Some(RejectReason::AlreadyEnrolled));

    let course = intake.store().get_course(CourseId(5)).unwrap();
    assert_eq!(course.students_enrolled, 1);
}

#[test]
fn test_total_is_price_plus_fee_with_ten_percent_tax() {
    let prices = ["0.00", "19.99", "49.95", "99.00", "149.49", "999.99"];
    let courses: Vec<Course> = prices
        .iter()
        .zip(1..)
        .map(|(price, id)| course(id, price))
        .collect();
    let intake = intake(store_with_courses(&courses));

    for c in &courses {
        let record = intake
            .submit_course_enrollment(&enrollment("pricing@example.com", c.id.0))
            .unwrap()
            .into_record()
            .unwrap();
        let expected = ((c.price + dec("10.00")) * dec("1.10"))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(record.total_amount, expected, "course price {}", c.price);
        assert_eq!(
            record.total_amount,
            c.price + record.platform_fee + record.tax_amount
        );
    }
}

#[test]
fn test_price_change_does_not_touch_existing_enrollment() {
    let intake = intake(store_with_courses(&[course(5, "199.00")]));
    intake
        .submit_course_enrollment(&enrollment("bob@example.com", 5))
        .unwrap();

    intake.store().add_course(course(5, "299.00"));
    let stored = intake
        .store()
        .enrollment(&"bob@example.com".parse().unwrap(), CourseId(5))
        .unwrap();
    assert_eq!(stored.total_amount, dec("229.90"));
}

#[test]
fn test_concurrent_duplicate_enrollments_have_one_winner() {
    let intake = intake(store_with_courses(&[course(5, "199.00")]));
    let submission = enrollment("race@example.com", 5);

    let decisions: Vec<Decision<_>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| intake.submit_course_enrollment(&submission).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = decisions.iter().filter(|d| d.is_accepted()).count();
    assert_eq!(accepted, 1);
    assert!(
        decisions
            .iter()
            .filter(|d| !d.is_accepted())
            .all(|d| d.reason() == Some(RejectReason::AlreadyEnrolled))
    );
    assert_eq!(intake.store().enrollment_count(), 1);
    assert_eq!(intake.store().get_course(CourseId(5)).unwrap().students_enrolled, 1);
}

#[test]
fn test_concurrent_enrollments_never_lose_counter_updates() {
    let intake = intake(store_with_courses(&[course(7, "50.00")]));

    std::thread::scope(|s| {
        for i in 0..50 {
            let intake = &intake;
            s.spawn(move || {
                let sub = enrollment(&format!("student{i}@example.com"), 7);
                assert!(intake.submit_course_enrollment(&sub).unwrap().is_accepted());
            });
        }
    });

    assert_eq!(intake.store().get_course(CourseId(7)).unwrap().students_enrolled, 50);
    assert_eq!(intake.store().course_stats().total_students, 50);
}

#[test]
fn test_enrollment_submitted_as_paid_settles_at_total() {
    let intake = intake(store_with_courses(&[course(5, "199.00")]));

    let mut paid = enrollment("paid@example.com", 5);
    paid.payment_status = PaymentStatus::Paid;
    let record = intake
        .submit_course_enrollment(&paid)
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(record.payment_status, PaymentStatus::Paid);
    assert_eq!(record.amount_paid, Some(dec("229.90")));

    let mut partial = enrollment("partial@example.com", 5);
    partial.payment_status = PaymentStatus::Paid;
    partial.amount_paid = Some(dec("100.00"));
    let record = intake
        .submit_course_enrollment(&partial)
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(record.amount_paid, Some(dec("100.00")));

    let pending = intake
        .submit_course_enrollment(&enrollment("pending@example.com", 5))
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(pending.payment_status, PaymentStatus::Pending);
    assert_eq!(pending.amount_paid, None);

    let stored = intake
        .store()
        .enrollment(&"paid@example.com".parse().unwrap(), CourseId(5))
        .unwrap();
    assert_eq!(stored.amount_paid, Some(dec("229.90")));
}

#[test]
fn test_enrollment_country_must_be_on_the_list() {
    let intake = intake(store_with_courses(&[course(5, "199.00")]));

    let mut sub = enrollment("ke@example.com", 5);
    sub.country = Some("ke".into());
    let record = intake.submit_course_enrollment(&sub).unwrap().into_record().unwrap();
    assert_eq!(record.country.as_deref(), Some("KE"));

    let mut sub = enrollment("gb@example.com", 5);
    sub.country = Some("GB".into());
    let decision = intake.submit_course_enrollment(&sub).unwrap();
    assert_eq!(decision.reason(), Some(RejectReason::InvalidCountry));
    assert_eq!(intake.store().get_course(CourseId(5)).unwrap().students_enrolled, 1);
}

// ── Project requests ────────────────────────────────────────────────

fn project_request(project_id: Option<u64>) -> ProjectRequestSubmission {
    serde_json::from_value(json!({
        "project_id": project_id,
        "custom_title": "Inventory tracker",
        "description": "Stock levels across two shops",
        "phone_number": "0712 345 678",
        "email": "Owner@Shop.example",
    }))
    .unwrap()
}

#[test]
fn test_project_requests_are_stored_with_sequential_ids() {
    let snapshot: Snapshot = serde_json::from_value(json!({
        "projects": [
            { "id": 1, "title": "POS", "category": "web" },
            { "id": 2, "title": "Legacy", "category": "desktop", "is_available": false },
        ],
    }))
    .unwrap();
    let intake = intake(MemoryStore::from_snapshot(snapshot).unwrap());

    let custom = intake
        .submit_project_request(&project_request(None))
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(custom.id.0, 1);
    assert_eq!(custom.request.project_id, None);
    assert_eq!(custom.request.phone_number, "0712345678");
    assert_eq!(custom.request.email.as_str(), "owner@shop.example");
    assert_eq!(custom.request.status, ProjectRequestStatus::Pending);

    let catalog = intake
        .submit_project_request(&project_request(Some(1)))
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(catalog.id.0, 2);
    assert_eq!(catalog.request.project_id, Some(ProjectId(1)));

    let unavailable = intake.submit_project_request(&project_request(Some(2))).unwrap();
    assert_eq!(unavailable.reason(), Some(RejectReason::ProjectUnavailable));
    assert_eq!(intake.store().project_request_count(), 2);
}
