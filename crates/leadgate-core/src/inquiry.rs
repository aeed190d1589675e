// ── Contact inquiry heuristics ──
//
// Two weak signals. A session that posts twice inside the spam window
// gets its second inquiry stored with status `spam`. A message with link
// or sales phrasing is flagged `suspicious` but keeps its status. Neither
// rejects anything; only the honeypot does that.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Lower-case phrases that mark a message as suspicious.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "http://",
    "https://",
    "www.",
    ".com/",
    "buy now",
    "click here",
];

/// Case-insensitive keyword scan.
pub fn is_suspicious(message: &str) -> bool {
    let lowered = message.to_lowercase();
    SUSPICIOUS_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// True when `now` is less than `window` after `previous`.
///
/// A `previous` later than `now` (clock skew between app servers) also
/// counts as inside the window.
pub fn within_spam_window(previous: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    match (now - previous).to_std() {
        Ok(elapsed) => elapsed < window,
        Err(_) => true,
    }
}

/// A hidden form field that a human never fills in.
pub fn honeypot_tripped(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
