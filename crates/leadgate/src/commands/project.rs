//! Project request handlers.

use leadgate_core::{Intake, NewProjectRequest, ProjectRequestSubmission};

use crate::cli::{CheckArgs, ProjectArgs, ProjectCommand};
use crate::config::Context;
use crate::error::CliError;

use super::util;

fn detail(r: &NewProjectRequest) -> Vec<(&'static str, String)> {
    vec![
        (
            "Project",
            r.project_id.map_or_else(|| "custom".to_owned(), |id| id.to_string()),
        ),
        ("Title", r.custom_title.clone()),
        ("Email", r.email.to_string()),
        ("Phone", r.phone_number.clone()),
        ("Status", r.status.to_string()),
    ]
}

pub fn handle(args: ProjectArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    match args.command {
        ProjectCommand::Check(check) => check_project_request(&check, ctx),
    }
}

fn check_project_request(args: &CheckArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let submission: ProjectRequestSubmission = util::read_json_file(&args.submission)?;
    let store = util::load_store(args.records.as_deref())?;
    let guard = ctx.guard()?;

    if let (true, Some(path)) = (args.save, args.records.as_deref()) {
        let intake = Intake::new(guard, store);
        let decision = intake.submit_project_request(&submission)?;
        if decision.is_accepted() {
            util::write_snapshot(intake.store(), path)?;
        }
        return util::finish_decision(ctx, &decision, |stored| {
            let mut rows = vec![("Request ID", stored.id.to_string())];
            rows.extend(detail(&stored.request));
            rows
        });
    }

    let decision = guard.evaluate_project_request(&store, &submission)?;
    util::finish_decision(ctx, &decision, detail)
}
