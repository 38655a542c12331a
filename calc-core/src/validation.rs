//! Field-level validation rules shared by the wizard and lead capture.
//!
//! Validation failures are ordinary values recovered locally by blocking
//! advancement and marking the offending control. They are never surfaced
//! as errors to callers.

use std::sync::LazyLock;

use regex::Regex;

/// Inline marker shown under an exclusive-choice group with no selection.
pub const CHOICE_REQUIRED_MESSAGE: &str = "Please select an option";

/// Inline marker shown under an empty required text field.
pub const FIELD_REQUIRED_MESSAGE: &str = "This field is required";

/// Letters across Latin, Cyrillic and CJK ranges plus space and hyphen,
/// at least two characters.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zА-Яа-яЁё\x{4E00}-\x{9FFF}\s\-]{2,}$")
        .expect("name pattern is a valid regex")
});

/// Checks a visitor name after trimming surrounding whitespace.
pub fn is_valid_name(value: &str) -> bool {
    NAME_PATTERN.is_match(value.trim())
}

/// Digit-based phone heuristic.
///
/// Accepts at least five digits composed only of digits, whitespace,
/// parentheses, hyphens and `+`. The allowed-character check also rules
/// out letters, so "call me maybe" never passes.
pub fn is_valid_phone(value: &str) -> bool {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return false;
    }

    let digits = cleaned.chars().filter(char::is_ascii_digit).count();
    if digits < 5 {
        return false;
    }

    cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '(' | ')' | '-' | '+'))
}
