//! Course enrollment handlers.

use leadgate_core::{EnrollmentSubmission, Intake};

use crate::cli::{CheckArgs, EnrollArgs, EnrollCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

/// Table rows shared by a priced enrollment and a stored one.
macro_rules! enrollment_rows {
    ($e:expr) => {
        vec![
            ("Name", $e.contact.full_name()),
            ("Email", $e.contact.email.to_string()),
            ("Course", $e.course_id.to_string()),
            ("Country", util::or_dash($e.country.as_deref())),
            ("Experience", $e.experience_level.to_string()),
            ("Status", $e.status.to_string()),
            ("Payment", $e.payment_status.to_string()),
            (
                "Amount Paid",
                $e.amount_paid.map_or_else(|| "-".to_owned(), |a| a.to_string()),
            ),
            ("Platform Fee", $e.platform_fee.to_string()),
            ("Tax", $e.tax_amount.to_string()),
            ("Total", $e.total_amount.to_string()),
        ]
    };
}

pub fn handle(args: EnrollArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    match args.command {
        EnrollCommand::Check(check) => check_enrollment(&check, ctx),
    }
}

fn check_enrollment(args: &CheckArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let submission: EnrollmentSubmission = util::read_json_file(&args.submission)?;
    let store = util::load_store(args.records.as_deref())?;
    let guard = ctx.guard()?;

    if let (true, Some(path)) = (args.save, args.records.as_deref()) {
        let intake = Intake::new(guard, store);
        let decision = intake.submit_course_enrollment(&submission)?;
        if decision.is_accepted() {
            util::write_snapshot(intake.store(), path)?;
        }
        return util::finish_decision(ctx, &decision, |e| {
            let mut rows = vec![("Enrollment ID", e.id.to_string())];
            rows.extend(enrollment_rows!(e));
            rows
        });
    }

    let decision = guard.evaluate_course_enrollment(&store, &submission)?;
    util::finish_decision(ctx, &decision, |e| enrollment_rows!(e))
}
