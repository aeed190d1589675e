//! Command dispatch: bridges CLI args -> guard decisions -> output formatting.

pub mod booking;
pub mod config_cmd;
pub mod enroll;
pub mod inquiry;
pub mod price;
pub mod project;
pub mod sanitize;
pub mod slots;
pub mod util;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a guard-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Booking(args) => booking::handle(args, ctx),
        Command::Enroll(args) => enroll::handle(args, ctx),
        Command::Inquiry(args) => inquiry::handle(args, ctx),
        Command::Project(args) => project::handle(args, ctx),
        Command::Price(args) => price::handle(&args, ctx),
        Command::Slots(args) => slots::handle(&args, ctx),
        Command::Sanitize(args) => sanitize::handle(&args, ctx),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
