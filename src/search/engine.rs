use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::models::{Record, SortField};

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Builds a case-insensitive pattern from user input.
///
/// Returns `None` for an empty query and for a pattern that does not compile.
pub fn compile_query(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }

    match RegexBuilder::new(query).case_insensitive(true).build() {
        Ok(pattern) => Some(pattern),
        Err(error) => {
            warn!("Invalid search pattern [{query}]: {error}");
            None
        }
    }
}

/// Keeps the records whose description, category, amount or date matches `query`.
///
/// An empty query keeps everything in input order. A query that is not a valid
/// pattern matches nothing.
pub fn filter<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let Some(pattern) = compile_query(query) else {
        return Vec::new();
    };

    records.iter()
        .filter(|record| is_match(&pattern, record))
        .collect()
}

/// Returns a new, stably sorted sequence. Descending order mirrors the
/// ascending comparator, so equal records keep their relative order either way.
pub fn sort<'a, I>(records: I, field: SortField, ascending: bool) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sorted: Vec<&Record> = records.into_iter().collect();

    sorted.sort_by(|left, right| {
        let ordering = compare(left, right, field);
        if ascending { ordering } else { ordering.reverse() }
    });

    sorted
}

/// Wraps every non-empty match of `pattern` in `<mark>` tags.
pub fn highlight(text: &str, pattern: Option<&Regex>) -> String {
    let Some(pattern) = pattern else {
        return text.to_string();
    };

    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for found in pattern.find_iter(text).filter(|found| !found.is_empty()) {
        output.push_str(&text[last..found.start()]);
        output.push_str(MARK_OPEN);
        output.push_str(found.as_str());
        output.push_str(MARK_CLOSE);
        last = found.end();
    }

    output.push_str(&text[last..]);
    output
}

fn is_match(pattern: &Regex, record: &Record) -> bool {
    pattern.is_match(&record.description)
        || pattern.is_match(&record.category)
        || pattern.is_match(&record.amount.to_string())
        || pattern.is_match(&record.date.to_string())
}

fn compare(left: &Record, right: &Record, field: SortField) -> Ordering {
    match field {
        SortField::Date => left.date.cmp(&right.date),
        SortField::Description => left.description.to_lowercase().cmp(&right.description.to_lowercase()),
        SortField::Amount => left.amount.cmp(&right.amount)
    }
}
