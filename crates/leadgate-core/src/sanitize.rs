// ── Text hygiene at the ingestion boundary ──
//
// Free text is cleaned once, on the way in: invalid UTF-8 becomes U+FFFD
// and control characters other than newline, carriage return, and tab are
// dropped. Stored text is therefore always valid and printable, so nothing
// downstream has to repair it after the fact.

use std::borrow::Cow;

use serde_json::{Map, Value};

fn is_kept(c: char) -> bool {
    !c.is_control() || matches!(c, '\n' | '\r' | '\t')
}

/// Strip disallowed control characters. Borrows when the input is clean.
pub fn sanitize_str(input: &str) -> Cow<'_, str> {
    if input.chars().all(is_kept) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.chars().filter(|c| is_kept(*c)).collect())
    }
}

/// Decode raw bytes as UTF-8 (lossy), then strip control characters.
pub fn sanitize_bytes(input: &[u8]) -> String {
    sanitize_str(&String::from_utf8_lossy(input)).into_owned()
}

/// Recursively sanitize every string (keys included) in a JSON document.
pub fn sanitize_json(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_owned(s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_json).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (sanitize_owned(k), sanitize_json(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Trim, sanitize, and drop the field entirely if nothing is left.
pub fn clean_optional(input: Option<&str>) -> Option<String> {
    let trimmed = input?.trim();
    let cleaned = sanitize_str(trimmed);
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_owned())
}

/// Trim and sanitize a required text field.
pub fn clean_text(input: &str) -> String {
    sanitize_str(input.trim()).trim().to_owned()
}

fn sanitize_owned(s: String) -> String {
    match sanitize_str(&s) {
        Cow::Borrowed(_) => s,
        Cow::Owned(cleaned) => cleaned,
    }
}
