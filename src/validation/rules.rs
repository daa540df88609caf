use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::types::Amount;
use crate::validation::FieldError;

const DATE_FORMAT: &str = "%Y-%m-%d";

static DESCRIPTION_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S(?:.*\S)?$").expect("hardcoded regex should be valid"));
static AMOUNT_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$").expect("hardcoded regex should be valid"));
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").expect("hardcoded regex should be valid")
});
static CATEGORY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$").expect("hardcoded regex should be valid"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("hardcoded regex should be valid"));

/// Failing fields only, keyed by field name.
pub type ValidationErrors = BTreeMap<String, FieldError>;

/// Checks one form field. Returns the first rule the value breaks, or `None`
/// when it passes or the field has no rules.
pub fn validate_field(name: &str, value: &str) -> Option<FieldError> {
    match name {
        "description" => validate_description(value),
        "amount" => validate_amount(value),
        "date" => validate_date(value),
        "category" => (!CATEGORY_FORMAT.is_match(value)).then_some(FieldError::CategoryFormat),
        _ => None
    }
}

/// Runs [`validate_field`] over every supplied field.
pub fn validate_all<'a, I>(fields: I) -> ValidationErrors
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .filter_map(|(name, value)| validate_field(name, value).map(|error| (name.to_string(), error)))
        .collect()
}

fn validate_description(value: &str) -> Option<FieldError> {
    if !DESCRIPTION_FORMAT.is_match(value) {
        return Some(FieldError::DescriptionTrim);
    }

    has_duplicate_word(value).then_some(FieldError::DuplicateWord)
}

/// The format check alone admits values too long to keep exactly, so the
/// amount must also parse.
fn validate_amount(value: &str) -> Option<FieldError> {
    if !AMOUNT_FORMAT.is_match(value) || Amount::from_str(value).is_err() {
        return Some(FieldError::AmountFormat);
    }

    None
}

fn validate_date(value: &str) -> Option<FieldError> {
    if !DATE_PATTERN.is_match(value) {
        return Some(FieldError::DateFormat);
    }

    (!is_real_date(value)).then_some(FieldError::CalendarDate)
}

/// True when the date survives a parse/format round trip, which rules out
/// values like `2023-02-30`.
fn is_real_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string() == value)
        .unwrap_or(false)
}

/// A word directly followed, across whitespace only, by the same word in any case.
fn has_duplicate_word(value: &str) -> bool {
    let mut words = WORD.find_iter(value).peekable();

    while let Some(word) = words.next() {
        let Some(next) = words.peek() else {
            break;
        };

        let gap = &value[word.end()..next.start()];

        if gap.chars().all(char::is_whitespace) && word.as_str().eq_ignore_ascii_case(next.as_str()) {
            return true;
        }
    }

    false
}
