use tracing::{debug, error, warn};

use crate::models::{ExchangeRates, Record};
use crate::storage::errors::StorageError;
use crate::storage::KeyValueStore;
use crate::types::Amount;

pub const RECORDS_KEY: &str = "records";
pub const RATES_KEY: &str = "rates";
pub const CAP_KEY: &str = "cap";

/// Reads and writes the record list and the persisted settings.
///
/// Storage failures never reach the caller: loads fall back to defaults and
/// failed saves are logged, leaving the in-memory state as the source of truth.
pub struct Persistence<S> {
    storage: S
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load_records(&self) -> Vec<Record> {
        match self.try_load_records() {
            Ok(records) => records,
            Err(error) => {
                warn!("Could not retrieve records, starting empty: {error}");
                Vec::new()
            }
        }
    }

    pub fn save_records(&self, records: &[Record]) {
        if let Err(error) = self.try_save_records(records) {
            error!("Unable to save records: {error}");
        }
    }

    pub fn load_exchange_rates(&self) -> ExchangeRates {
        match self.try_load_exchange_rates() {
            Ok(Some(rates)) => rates,
            Ok(None) => ExchangeRates::default(),
            Err(error) => {
                warn!("Could not load exchange rates, using defaults: {error}");
                ExchangeRates::default()
            }
        }
    }

    pub fn save_exchange_rates(&self, rates: &ExchangeRates) {
        let result = serde_json::to_string(rates)
            .map_err(|error| StorageError::encode(RATES_KEY, error))
            .and_then(|encoded| self.storage.set(RATES_KEY, &encoded));

        if let Err(error) = result {
            error!("Unable to save exchange rates: {error}");
        }
    }

    pub fn load_budget_cap(&self) -> Amount {
        match self.try_load_budget_cap() {
            Ok(Some(cap)) => cap,
            Ok(None) => Amount::ZERO,
            Err(error) => {
                warn!("Could not load budget cap, using none: {error}");
                Amount::ZERO
            }
        }
    }

    pub fn save_budget_cap(&self, cap: Amount) {
        if let Err(error) = self.storage.set(CAP_KEY, &cap.to_string()) {
            error!("Unable to save budget cap: {error}");
        }
    }

    fn try_load_records(&self) -> Result<Vec<Record>, StorageError> {
        let Some(raw) = self.storage.get(RECORDS_KEY)? else {
            debug!("No stored records found");
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|error| StorageError::decode(RECORDS_KEY, error))
    }

    fn try_save_records(&self, records: &[Record]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(records).map_err(|error| StorageError::encode(RECORDS_KEY, error))?;
        self.storage.set(RECORDS_KEY, &encoded)?;

        debug!("Saved {} records", records.len());

        Ok(())
    }

    fn try_load_exchange_rates(&self) -> Result<Option<ExchangeRates>, StorageError> {
        let Some(raw) = self.storage.get(RATES_KEY)? else {
            return Ok(None);
        };

        let rates: ExchangeRates = serde_json::from_str(&raw).map_err(|error| StorageError::decode(RATES_KEY, error))?;
        rates.validate().map_err(|error| StorageError::decode(RATES_KEY, error))?;

        Ok(Some(rates))
    }

    fn try_load_budget_cap(&self) -> Result<Option<Amount>, StorageError> {
        let Some(raw) = self.storage.get(CAP_KEY)? else {
            return Ok(None);
        };

        let cap = Amount::parse_rounded(&raw).map_err(|error| StorageError::decode(CAP_KEY, error))?;

        if cap.is_negative() {
            return Err(StorageError::decode(CAP_KEY, format!("negative cap [{cap}]")));
        }

        Ok(Some(cap))
    }
}
