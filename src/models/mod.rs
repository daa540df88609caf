mod errors;
mod record;
mod settings;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::types::Amount;

pub use errors::{SettingsError, StoreError, UnknownSortField};
pub use record::{Record, RecordFields, RecordPatch};
pub use settings::{ExchangeRates, Settings, DEFAULT_EUR_RATE, DEFAULT_GBP_RATE, DEFAULT_USD_RATE};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SortField {
    Description,
    Amount,
    Date
}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "description" => Ok(SortField::Description),
            "amount" => Ok(SortField::Amount),
            "date" => Ok(SortField::Date),
            _ => Err(UnknownSortField(value.to_string()))
        }
    }
}

impl Display for SortField {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Description => "description",
            SortField::Amount => "amount",
            SortField::Date => "date"
        };
        formatter.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Currency {
    Usd,
    Eur,
    Gbp
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];
}

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP"
        };
        formatter.write_str(code)
    }
}

/// Dashboard aggregates over the whole (unfiltered) collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_records: usize,
    pub total_amount: Amount,
    pub top_category: String,
    pub last_7_days_total: Amount
}
