//! Contact inquiry handlers.

use leadgate_core::{Intake, InquirySubmission, NewInquiry};

use crate::cli::{CheckArgs, InquiryArgs, InquiryCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

fn detail(i: &NewInquiry) -> Vec<(&'static str, String)> {
    vec![
        ("Name", i.contact.full_name()),
        ("Email", i.contact.email.to_string()),
        ("Department", i.department.to_string()),
        ("Subject", i.subject.clone()),
        ("Status", i.status.to_string()),
        ("Priority", i.priority.to_string()),
        ("Suspicious", i.suspicious.to_string()),
        ("Newsletter", i.newsletter_subscribed.to_string()),
    ]
}

pub fn handle(args: InquiryArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    match args.command {
        InquiryCommand::Check(check) => check_inquiry(&check, ctx),
    }
}

fn check_inquiry(args: &CheckArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let submission: InquirySubmission = util::read_json_file(&args.submission)?;
    let store = util::load_store(args.records.as_deref())?;
    let guard = ctx.guard()?;

    if let (true, Some(path)) = (args.save, args.records.as_deref()) {
        let intake = Intake::new(guard, store);
        let decision = intake.submit_contact_inquiry(&submission)?;
        if decision.is_accepted() {
            util::write_snapshot(intake.store(), path)?;
        }
        return util::finish_decision(ctx, &decision, |stored| {
            let mut rows = vec![("Inquiry ID", stored.id.to_string())];
            rows.extend(detail(&stored.inquiry));
            rows
        });
    }

    let decision = guard.evaluate_contact_inquiry(&store, &submission)?;
    util::finish_decision(ctx, &decision, detail)
}
