//! `leadgate sanitize`: clean a document the way submissions are cleaned.

use serde_json::Value;

use leadgate_core::sanitize::{sanitize_bytes, sanitize_json};

use crate::cli::{OutputFormat, SanitizeArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &SanitizeArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let bytes = std::fs::read(&args.input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: args.input.display().to_string(),
        },
        _ => CliError::Io(e),
    })?;

    // Invalid UTF-8 can sit inside a string literal, so decode lossily first.
    let text = sanitize_bytes(&bytes);
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(doc) => {
            let doc = sanitize_json(doc);
            match ctx.output {
                OutputFormat::JsonCompact => output::render_json(&doc, true)?,
                OutputFormat::Yaml => output::render_yaml(&doc)?,
                _ => output::render_json(&doc, false)?,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "input is not JSON, emitting cleaned text");
            text
        }
    };
    ctx.print(&rendered);
    Ok(())
}
