use chrono::{Days, Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::models::{
    ExchangeRates, Record, RecordFields, RecordPatch, Settings, SettingsError, SortField, Stats, StoreError,
};
use crate::search::{filter, sort};
use crate::storage::{KeyValueStore, Persistence};
use crate::types::{Amount, RecordId, Timestamp};

const NO_CATEGORY: &str = "None";
const WINDOW_DAYS: u64 = 7;

/// Sole owner of the record collection and the settings.
///
/// Every mutation goes through this type and is persisted before it returns.
/// Readers get either the raw list or the filtered and sorted view.
pub struct RecordStore<S> {
    records: Vec<Record>,
    settings: Settings,
    persistence: Persistence<S>
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Loads records, budget cap and exchange rates from `storage`.
    /// Missing or corrupt values fall back to defaults.
    pub fn open(storage: S) -> Self {
        let persistence = Persistence::new(storage);
        let records = persistence.load_records();
        let settings = Settings {
            budget_cap: persistence.load_budget_cap(),
            exchange_rates: persistence.load_exchange_rates(),
            ..Settings::default()
        };

        info!("Opened record store with {} records", records.len());

        Self {
            records,
            settings,
            persistence
        }
    }

    /// All records in insertion order, unfiltered.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// The display view: the active search applied, then the active sort.
    pub fn query(&self) -> Vec<&Record> {
        let filtered = filter(&self.records, &self.settings.search_query);
        sort(filtered, self.settings.sort_field, self.settings.sort_ascending)
    }

    /// Appends a new record built from already validated fields.
    pub fn create(&mut self, fields: RecordFields) -> Record {
        let now = Utc::now();
        let record = Record::new(self.next_id(now), fields, now);

        self.records.push(record.clone());
        self.persistence.save_records(&self.records);

        debug!("Created record [{}]", record.id);

        record
    }

    /// Merges `patch` into the record with `id`. A missing id changes nothing.
    pub fn update(&mut self, id: &str, patch: RecordPatch) -> Result<Record, StoreError> {
        let record = self.records.iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::record_not_found(id))?;

        record.apply(patch, Utc::now());
        let updated = record.clone();

        self.persistence.save_records(&self.records);

        debug!("Updated record [{id}]");

        Ok(updated)
    }

    /// Removes the record with `id` if present and returns whether it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;

        self.persistence.save_records(&self.records);

        debug!("Delete of record [{id}] removed: {removed}");

        removed
    }

    /// Swaps in an imported collection wholesale.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
        self.persistence.save_records(&self.records);

        info!("Replaced collection with {} records", self.records.len());
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.settings.search_query = query.into();
    }

    pub fn set_sort(&mut self, field: SortField) {
        self.settings.toggle_sort(field);
    }

    pub fn budget_cap(&self) -> Amount {
        self.settings.budget_cap
    }

    pub fn set_budget_cap(&mut self, cap: Amount) -> Result<(), SettingsError> {
        if cap.is_negative() {
            return Err(SettingsError::NegativeBudgetCap { value: cap });
        }

        self.settings.budget_cap = cap;
        self.persistence.save_budget_cap(cap);

        Ok(())
    }

    pub fn exchange_rates(&self) -> ExchangeRates {
        self.settings.exchange_rates
    }

    pub fn set_exchange_rates(&mut self, rates: ExchangeRates) -> Result<(), SettingsError> {
        rates.validate()?;

        self.settings.exchange_rates = rates;
        self.persistence.save_exchange_rates(&rates);

        Ok(())
    }

    pub fn stats(&self) -> Stats {
        self.stats_on(Local::now().date_naive())
    }

    /// Aggregates with the seven-day window ending on `today`, inclusive.
    pub fn stats_on(&self, today: NaiveDate) -> Stats {
        let window_start = today.checked_sub_days(Days::new(WINDOW_DAYS - 1)).unwrap_or(NaiveDate::MIN);

        Stats {
            total_records: self.records.len(),
            total_amount: self.total_amount(),
            top_category: self.top_category().unwrap_or(NO_CATEGORY).to_string(),
            last_7_days_total: self.records.iter()
                .filter(|record| record.date >= window_start && record.date <= today)
                .map(|record| record.amount)
                .sum()
        }
    }

    /// Cap minus total spent. Negative when over budget.
    pub fn remaining_budget(&self) -> Amount {
        self.settings.budget_cap - self.total_amount()
    }

    fn total_amount(&self) -> Amount {
        self.records.iter().map(|record| record.amount).sum()
    }

    /// Most frequent category. Ties go to the category seen first.
    fn top_category(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();

        for record in &self.records {
            match counts.iter_mut().find(|(category, _)| *category == record.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.category.as_str(), 1))
            }
        }

        let mut top: Option<(&str, usize)> = None;

        for (category, count) in counts {
            if top.is_none_or(|(_, best)| count > best) {
                top = Some((category, count));
            }
        }

        top.map(|(category, _)| category)
    }

    fn next_id(&self, now: Timestamp) -> RecordId {
        let mut millis = now.timestamp_millis();

        loop {
            let id = format!("txn_{millis}");

            if self.find(&id).is_none() {
                return id;
            }

            millis += 1;
        }
    }
}
