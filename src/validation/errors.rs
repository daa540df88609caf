use thiserror::Error;

/// A user-input failure for a single form field. The display text is the
/// message shown next to the field.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum FieldError {
    #[error("Description: remove leading/trailing spaces")]
    DescriptionTrim,
    #[error("Description: contains duplicate consecutive words")]
    DuplicateWord,
    #[error("Amount: must be a valid number with max 2 decimal places")]
    AmountFormat,
    #[error("Date: use YYYY-MM-DD format")]
    DateFormat,
    #[error("Date: invalid calendar date")]
    CalendarDate,
    #[error("Category: only letters, spaces, and hyphens allowed")]
    CategoryFormat
}
