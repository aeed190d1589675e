//! Demo booking handlers.

use leadgate_core::{BookingSubmission, DemoBooking, Intake};

use crate::cli::{BookingArgs, BookingCommand, CheckArgs};
use crate::config::Context;
use crate::error::CliError;

use super::util;

fn detail(b: &DemoBooking) -> Vec<(&'static str, String)> {
    vec![
        ("Booking ID", b.booking_id.to_string()),
        ("Name", b.contact.full_name()),
        ("Email", b.contact.email.to_string()),
        ("Company", util::or_dash(b.contact.company.as_deref())),
        ("When", b.formatted_datetime()),
        ("Title", b.demo_title.clone()),
        ("Attendees", b.number_of_attendees.to_string()),
        ("Platform", b.meeting_platform.to_string()),
        ("Status", b.status.to_string()),
    ]
}

pub fn handle(args: BookingArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    match args.command {
        BookingCommand::Check(check) => check_booking(&check, ctx),
    }
}

fn check_booking(args: &CheckArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let submission: BookingSubmission = util::read_json_file(&args.submission)?;
    let store = util::load_store(args.records.as_deref())?;
    let guard = ctx.guard()?;

    let decision = match args.records.as_deref() {
        Some(path) if args.save => {
            let intake = Intake::new(guard, store);
            let decision = intake.submit_demo_booking(&submission)?;
            if decision.is_accepted() {
                util::write_snapshot(intake.store(), path)?;
            }
            decision
        }
        _ => guard.evaluate_demo_booking(&store, &submission)?,
    };

    util::finish_decision(ctx, &decision, detail)
}
