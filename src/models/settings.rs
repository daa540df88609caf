use serde::{Deserialize, Serialize};

use crate::models::errors::SettingsError;
use crate::models::{Currency, SortField};
use crate::types::Amount;

pub const DEFAULT_USD_RATE: f64 = 1.0;
pub const DEFAULT_EUR_RATE: f64 = 0.85;
pub const DEFAULT_GBP_RATE: f64 = 0.73;

/// Conversion rates relative to USD. Stored for display only, totals are never converted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    #[serde(rename = "USD")]
    pub usd: f64,
    #[serde(rename = "EUR")]
    pub eur: f64,
    #[serde(rename = "GBP")]
    pub gbp: f64
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            usd: DEFAULT_USD_RATE,
            eur: DEFAULT_EUR_RATE,
            gbp: DEFAULT_GBP_RATE
        }
    }
}

impl ExchangeRates {
    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
            Currency::Gbp => self.gbp
        }
    }

    /// Checks that every rate is a finite, strictly positive number.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for currency in Currency::ALL {
            let value = self.rate(currency);

            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NonPositiveRate { currency, value });
            }
        }

        Ok(())
    }
}

/// Process-wide settings owned by the record store.
///
/// Only `budget_cap` and `exchange_rates` outlive the process, the sort and
/// search state reset on every start.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sort_field: SortField,
    pub sort_ascending: bool,
    pub search_query: String,
    /// Zero means no cap has been set.
    pub budget_cap: Amount,
    pub exchange_rates: ExchangeRates
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_field: SortField::Date,
            sort_ascending: false,
            search_query: String::new(),
            budget_cap: Amount::ZERO,
            exchange_rates: ExchangeRates::default()
        }
    }
}

impl Settings {
    /// Selecting the active field flips the direction, selecting another
    /// field starts newest-first for dates and A→Z / low→high otherwise.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_field = field;
            self.sort_ascending = field != SortField::Date;
        }
    }
}
