//! Validation rule vocabulary used by every entity form.
//!
//! Each rule is a plain predicate over the raw field text. Rules that talk
//! about content (length, character classes) look at the trimmed value;
//! [`has_no_leading_space`] is the only rule that inspects the raw input.

use std::sync::LazyLock;

use regex::Regex;

use super::rich_text;

static ALPHABETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z\s]*$").expect("valid regex"));
static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\- ]+$").expect("valid regex"));
static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s]+$").expect("valid regex"));
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+\d{1,2}\s)?\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}$").expect("valid regex")
});
static LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{3,}").expect("valid regex"));
static NPI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,10}$").expect("valid regex"));

/// Characters allowed in a password besides ASCII letters and digits.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Trimmed value is non-empty.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Value does not start with whitespace.
pub fn has_no_leading_space(value: &str) -> bool {
    !value.starts_with(char::is_whitespace)
}

/// Trimmed value has at least `min` characters.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Letters and inner spaces only, starting with a letter.
pub fn is_alphabetic(value: &str) -> bool {
    ALPHABETIC.is_match(value.trim())
}

/// Letters, hyphens and spaces, as accepted for a person's full name.
pub fn is_person_name(value: &str) -> bool {
    PERSON_NAME.is_match(value.trim())
}

/// Letters, digits and spaces only.
pub fn is_alphanumeric(value: &str) -> bool {
    ALPHANUMERIC.is_match(value.trim())
}

/// Digits only.
pub fn is_numeric(value: &str) -> bool {
    NUMERIC.is_match(value.trim())
}

/// Non-negative decimal number, e.g. `12` or `12.50`.
pub fn is_decimal(value: &str) -> bool {
    DECIMAL.is_match(value.trim())
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// `(XXX) XXX-XXXX` or `+XX (XXX) XXX-XXXX`.
pub fn is_phone(value: &str) -> bool {
    PHONE.is_match(value.trim())
}

/// Value consists of digits and spaces only.
pub fn is_only_digits(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c == ' ')
}

/// Value has no letter or digit at all.
pub fn is_only_symbols(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Value contains at least three consecutive letters.
pub fn has_letter_run(value: &str) -> bool {
    LETTER_RUN.is_match(value)
}

/// At least one lowercase, uppercase, digit and special character, no
/// other characters, and at least [`MIN_PASSWORD_LEN`] long.
pub fn is_strong_password(value: &str) -> bool {
    let value = value.trim();
    if value.chars().count() < MIN_PASSWORD_LEN {
        return false;
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    value.chars().all(allowed)
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// National provider identifier: up to ten digits.
pub fn is_npi_number(value: &str) -> bool {
    NPI.is_match(value.trim())
}

/// HTML has visible text once tags are stripped.
pub fn has_rich_text_content(html: &str) -> bool {
    !rich_text::plain_text(html).trim().is_empty()
}
