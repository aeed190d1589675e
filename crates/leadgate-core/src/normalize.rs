// ── Input normalizer ──
//
// Pure functions from raw form fields to normalized values. Every
// submission passes through here before any record is consulted.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{RejectReason, Rejection};
use crate::model::{ContactDetails, ContactInput, EmailAddress, PhoneNumber};
use crate::sanitize;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 100;

/// Dot-atom local part.
static LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("Invalid email local-part regex")
});

/// One or more labels followed by a TLD of at least two characters.
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9-]{2,63}$")
        .expect("Invalid email domain regex")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("Invalid phone regex"));

/// Project requests take a contact number with 9 to 15 digits.
static PROJECT_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("Invalid project phone regex"));

const MAX_PROJECT_PHONE_LEN: usize = 15;

/// Countries offered on the enrollment form.
pub const ALLOWED_COUNTRIES: [&str; 14] = [
    "US", "UK", "CA", "AU", "IN", "DE", "FR", "JP", "SG", "AE", "ZA", "NG", "KE", "GH",
];

/// Trim and lower-case an email address, then check its grammar.
pub fn normalize_email(raw: &str) -> Result<EmailAddress, Rejection> {
    let email = raw.trim().to_lowercase();
    let invalid = || Rejection::on_field(RejectReason::InvalidEmail, "email");

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(invalid());
    };
    if local.len() > MAX_LOCAL_PART_LEN
        || !LOCAL_PART.is_match(local)
        || !DOMAIN.is_match(domain)
        || domain.ends_with('-')
    {
        return Err(invalid());
    }

    Ok(EmailAddress::from_normalized(email))
}

fn compact_phone(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// Trim a phone number, drop spaces, hyphens, and parentheses, then check
/// it against `^\+?[1-9]\d{0,15}$`.
pub fn normalize_phone(raw: &str) -> Result<PhoneNumber, Rejection> {
    let compact = compact_phone(raw);

    if PHONE.is_match(&compact) {
        Ok(PhoneNumber::from_normalized(compact))
    } else {
        Err(Rejection::on_field(RejectReason::InvalidPhone, "phone"))
    }
}

/// Phone is optional on every form: blank means absent.
pub fn normalize_optional_phone(raw: Option<&str>) -> Result<Option<PhoneNumber>, Rejection> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_phone(value).map(Some),
    }
}

/// Phone number on a project request. Same compaction as
/// [`normalize_phone`], but a stricter digit count and a 15-character cap.
pub fn normalize_project_phone(raw: &str) -> Result<String, Rejection> {
    let compact = compact_phone(raw);

    if compact.len() <= MAX_PROJECT_PHONE_LEN && PROJECT_PHONE.is_match(&compact) {
        Ok(compact)
    } else {
        Err(Rejection::on_field(RejectReason::InvalidPhone, "phone_number")
            .with_message("Phone number must be 9 to 15 digits, optionally starting with '+'."))
    }
}

/// Optional country code, trimmed and upper-cased. Blank means absent;
/// anything else must be one of [`ALLOWED_COUNTRIES`].
pub fn normalize_country(raw: Option<&str>) -> Result<Option<String>, Rejection> {
    let Some(code) = sanitize::clean_optional(raw) else {
        return Ok(None);
    };
    let code = code.to_uppercase();
    if ALLOWED_COUNTRIES.contains(&code.as_str()) {
        Ok(Some(code))
    } else {
        Err(Rejection::on_field(RejectReason::InvalidCountry, "country"))
    }
}

/// Required free text: cleaned, non-empty, and at most `max_chars`
/// characters when a limit is given.
pub fn require_text(raw: &str, field: &str, max_chars: Option<usize>) -> Result<String, Rejection> {
    let text = sanitize::clean_text(raw);
    if text.is_empty() {
        return Err(Rejection::on_field(RejectReason::MissingField, field));
    }
    match max_chars {
        Some(max) if text.chars().count() > max => {
            Err(Rejection::on_field(RejectReason::FieldTooLong, field)
                .with_message(format!("Ensure this value has at most {max} characters.")))
        }
        _ => Ok(text),
    }
}

/// Trim a personal name; at least two characters, letters, spaces, and
/// hyphens only.
pub fn normalize_name(raw: &str, field: &str) -> Result<String, Rejection> {
    let name = raw.trim();
    let len = name.chars().count();
    let allowed = name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-');

    if (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) && allowed {
        Ok(name.to_owned())
    } else {
        Err(Rejection::on_field(RejectReason::InvalidName, field))
    }
}

/// Normalize a full contact block in form order: first name, last name,
/// email, phone. The first failure wins.
pub fn normalize_contact(input: &ContactInput) -> Result<ContactDetails, Rejection> {
    Ok(ContactDetails {
        first_name: normalize_name(&input.first_name, "first_name")?,
        last_name: normalize_name(&input.last_name, "last_name")?,
        email: normalize_email(&input.email)?,
        phone: normalize_optional_phone(input.phone.as_deref())?,
        company: sanitize::clean_optional(input.company.as_deref()),
    })
}
