mod errors;
mod rules;

pub use errors::FieldError;
pub use rules::{validate_all, validate_field, ValidationErrors};
