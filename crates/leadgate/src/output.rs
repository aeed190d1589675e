//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use leadgate_core::Decision;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// `accepted` in green or `rejected` in red.
pub fn outcome_label(accepted: bool, color: bool) -> String {
    match (accepted, color) {
        (true, true) => "accepted".green().bold().to_string(),
        (false, true) => "rejected".red().bold().to_string(),
        (true, false) => "accepted".into(),
        (false, false) => "rejected".into(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item. Table mode uses `detail_fn` for a field/value view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> Vec<(&'static str, String)>,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(render_detail(&detail_fn(data))),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Render a guard decision. Accepted records are described by
/// `detail_fn`; rejections always show reason, field and message.
pub fn render_decision<T>(
    format: OutputFormat,
    decision: &Decision<T>,
    color: bool,
    detail_fn: impl Fn(&T) -> Vec<(&'static str, String)>,
) -> Result<String, CliError>
where
    T: Serialize,
{
    let detail = |d: &Decision<T>| {
        let mut rows = vec![("Outcome", outcome_label(d.is_accepted(), color))];
        match d {
            Decision::Accepted { record } => rows.extend(detail_fn(record)),
            Decision::Rejected { rejection } => {
                rows.push(("Reason", rejection.reason.code().to_owned()));
                if let Some(field) = &rejection.field {
                    rows.push(("Field", field.clone()));
                }
                rows.push(("Message", rejection.message.clone()));
            }
        }
        rows
    };
    let plain = |d: &Decision<T>| match d.reason() {
        None => "accepted".to_owned(),
        Some(reason) => format!("rejected {}", reason.code()),
    };
    render_single(format, decision, detail, plain)
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn render_detail(pairs: &[(&'static str, String)]) -> String {
    let rows: Vec<DetailRow> = pairs
        .iter()
        .map(|(field, value)| DetailRow {
            field: *field,
            value: value.clone(),
        })
        .collect();
    render_table(&rows)
}

pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Serialize(e.to_string()))
}

pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Serialize(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use leadgate_core::{RejectReason, Rejection};

    #[test]
    fn rejected_decision_renders_plain_code() {
        let d: Decision<u32> = Decision::rejected(Rejection::new(RejectReason::TooManyPending));
        let out = render_decision(OutputFormat::Plain, &d, false, |_| Vec::new()).unwrap();
        assert_eq!(out, "rejected too_many_pending");
    }

    #[test]
    fn rejected_decision_table_shows_reason() {
        let d: Decision<u32> =
            Decision::rejected(Rejection::on_field(RejectReason::InvalidDate, "demo_date"));
        let out = render_decision(OutputFormat::Table, &d, false, |_| Vec::new()).unwrap();
        assert!(out.contains("invalid_date"));
        assert!(out.contains("demo_date"));
        assert!(out.contains("rejected"));
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_json(&serde_json::json!({"a": [1, 2]}), true).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn color_off_is_bare_label() {
        assert_eq!(outcome_label(true, false), "accepted");
        assert_ne!(outcome_label(false, true), "rejected");
    }
}
