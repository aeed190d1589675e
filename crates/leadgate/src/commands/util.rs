//! Shared helpers for command handlers.

use std::io;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;

use leadgate_core::sanitize::sanitize_bytes;
use leadgate_core::{Decision, MemoryStore, Snapshot};

use crate::config::Context;
use crate::error::CliError;
use crate::output;

/// Read a JSON file, cleaning invalid UTF-8 and control characters first.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CliError::Io(e),
    })?;
    serde_json::from_str(&sanitize_bytes(&bytes)).map_err(|e| CliError::InvalidFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Seed a store from a records file, or start empty.
pub fn load_store(records: Option<&Path>) -> Result<MemoryStore, CliError> {
    let Some(path) = records else {
        return Ok(MemoryStore::new());
    };
    let snapshot: Snapshot = read_json_file(path)?;
    let store = MemoryStore::from_snapshot(snapshot)?;
    tracing::debug!(
        path = %path.display(),
        bookings = store.booking_count(),
        enrollments = store.enrollment_count(),
        inquiries = store.inquiry_count(),
        project_requests = store.project_request_count(),
        "records loaded"
    );
    Ok(store)
}

/// Write the store back to the records file as pretty JSON.
pub fn write_snapshot(store: &MemoryStore, path: &Path) -> Result<(), CliError> {
    let mut json = output::render_json(&store.snapshot(), false)?;
    json.push('\n');
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), version = store.version(), "records saved");
    Ok(())
}

pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}' ({e})"),
    })
}

pub fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, CliError> {
    Decimal::from_str(raw.trim()).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected a decimal number, got '{raw}' ({e})"),
    })
}

/// Print a decision. A rejection becomes the command's error so the
/// process exits non-zero.
pub fn finish_decision<T: Serialize>(
    ctx: &Context<'_>,
    decision: &Decision<T>,
    detail_fn: impl Fn(&T) -> Vec<(&'static str, String)>,
) -> Result<(), CliError> {
    let rendered = output::render_decision(ctx.output, decision, ctx.color, detail_fn)?;
    ctx.print(&rendered);
    match decision.rejection() {
        Some(rejection) => Err(rejection.clone().into()),
        None => Ok(()),
    }
}

/// `"-"` for absent optional fields in table views.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}
