use crate::models::Currency;
use crate::types::{Amount, RecordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record [{id}] was not found")]
    RecordNotFound {
        id: RecordId
    }
}

impl StoreError {
    pub fn record_not_found(id: &str) -> Self {
        Self::RecordNotFound { id: id.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Budget cap must not be negative, got [{value}]")]
    NegativeBudgetCap {
        value: Amount
    },
    #[error("Exchange rate for [{currency}] must be a positive number, got [{value}]")]
    NonPositiveRate {
        currency: Currency,
        value: f64
    }
}

#[derive(Debug, Error)]
#[error("Unknown sort field [{0}], expected one of: description, amount, date")]
pub struct UnknownSortField(pub String);
