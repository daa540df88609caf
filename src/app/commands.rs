use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::app::cli::{BudgetAction, Command, EditArgs, FormatArg, RatesAction, RecordArgs};
use crate::app::StatusMessage;
use crate::models::{
    ExchangeRates, Record, RecordFields, RecordPatch, SortField, DEFAULT_EUR_RATE, DEFAULT_GBP_RATE, DEFAULT_USD_RATE,
};
use crate::search::{compile_query, highlight};
use crate::storage::{import_file, write_export, KeyValueStore};
use crate::store::RecordStore;
use crate::types::Amount;
use crate::validation::{validate_all, ValidationErrors};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Runs one command against the store and describes the outcome.
///
/// User mistakes (bad input, unknown id, failed import) come back as urgent
/// status messages, `Err` is reserved for failures the user cannot fix.
pub async fn execute<S: KeyValueStore>(store: &mut RecordStore<S>, command: Command) -> Result<StatusMessage> {
    match command {
        Command::Add(args) => add_record(store, args),
        Command::Edit { id, fields } => edit_record(store, &id, fields),
        Command::Delete { id } => Ok(delete_record(store, &id)),
        Command::List { search, sort } => Ok(list_records(store, search, &sort)),
        Command::Stats => Ok(StatusMessage::info(render_stats(store))),
        Command::Budget { action } => Ok(budget(store, action)),
        Command::Rates { action } => Ok(rates(store, action)),
        Command::Export { path, format } => Ok(export(store, &path, format).await),
        Command::Import { path } => Ok(import(store, &path).await)
    }
}

fn add_record<S: KeyValueStore>(store: &mut RecordStore<S>, args: RecordArgs) -> Result<StatusMessage> {
    let errors = validate_all([
        ("description", args.description.as_str()),
        ("amount", args.amount.as_str()),
        ("category", args.category.as_str()),
        ("date", args.date.as_str())
    ]);

    if !errors.is_empty() {
        return Ok(form_errors(&errors));
    }

    let fields = RecordFields {
        amount: Amount::from_str(&args.amount).context("validated amount did not parse")?,
        date: NaiveDate::parse_from_str(&args.date, DATE_FORMAT).context("validated date did not parse")?,
        description: args.description,
        category: args.category
    };

    let record = store.create(fields);
    info!("Added record [{}]", record.id);

    Ok(StatusMessage::info(format!("Added record {}", record.id)))
}

fn edit_record<S: KeyValueStore>(store: &mut RecordStore<S>, id: &str, args: EditArgs) -> Result<StatusMessage> {
    let supplied: Vec<(&str, &str)> = [
        ("description", args.description.as_deref()),
        ("amount", args.amount.as_deref()),
        ("category", args.category.as_deref()),
        ("date", args.date.as_deref())
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|value| (name, value)))
    .collect();

    if supplied.is_empty() {
        return Ok(StatusMessage::alert("Nothing to update: supply at least one field."));
    }

    let errors = validate_all(supplied);

    if !errors.is_empty() {
        return Ok(form_errors(&errors));
    }

    let patch = RecordPatch {
        amount: args.amount.as_deref().map(Amount::from_str).transpose().context("validated amount did not parse")?,
        date: args.date.as_deref()
            .map(|date| NaiveDate::parse_from_str(date, DATE_FORMAT))
            .transpose()
            .context("validated date did not parse")?,
        description: args.description,
        category: args.category
    };

    match store.update(id, patch) {
        Ok(record) => Ok(StatusMessage::info(format!("Updated record {}", record.id))),
        Err(error) => Ok(StatusMessage::alert(error.to_string()))
    }
}

fn delete_record<S: KeyValueStore>(store: &mut RecordStore<S>, id: &str) -> StatusMessage {
    if store.delete(id) {
        StatusMessage::info(format!("Deleted record {id}"))
    } else {
        StatusMessage::info(format!("No record with id {id}, nothing deleted"))
    }
}

fn list_records<S: KeyValueStore>(store: &mut RecordStore<S>, search: String, sort: &[String]) -> StatusMessage {
    for name in sort {
        match SortField::from_str(name) {
            Ok(field) => store.set_sort(field),
            Err(error) => warn!("{error}, keeping current order")
        }
    }

    let pattern = compile_query(&search);
    store.set_search_query(search);

    let records = store.query();
    let total = store.list().len();

    if records.is_empty() {
        return StatusMessage::info(format!("No records found (0 of {total})"));
    }

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(format!("{:<18} {:<10} {:>10}  {:<20} {}", "ID", "DATE", "AMOUNT", "CATEGORY", "DESCRIPTION"));
    lines.extend(records.iter().map(|record| render_row(record, pattern.as_ref())));
    lines.push(format!("{} of {total} records", records.len()));

    StatusMessage::info(lines.join("\n"))
}

fn render_row(record: &Record, pattern: Option<&regex::Regex>) -> String {
    format!(
        "{:<18} {:<10} {:>10}  {:<20} {}",
        record.id,
        record.date.to_string(),
        format!("${}", record.amount.to_fixed()),
        highlight(&record.category, pattern),
        highlight(&record.description, pattern)
    )
}

fn render_stats<S: KeyValueStore>(store: &RecordStore<S>) -> String {
    let stats = store.stats();

    [
        format!("Total records: {}", stats.total_records),
        format!("Total amount: ${}", stats.total_amount.to_fixed()),
        format!("Top category: {}", stats.top_category),
        format!("Last 7 days: ${}", stats.last_7_days_total.to_fixed()),
        budget_status(store)
    ]
    .join("\n")
}

fn budget_status<S: KeyValueStore>(store: &RecordStore<S>) -> String {
    if store.budget_cap() == Amount::ZERO {
        return "Budget cap: not set".to_string();
    }

    let remaining = store.remaining_budget();

    if remaining.is_negative() {
        format!("Over budget by: ${}", remaining.abs().to_fixed())
    } else {
        format!("Remaining: ${}", remaining.to_fixed())
    }
}

fn budget<S: KeyValueStore>(store: &mut RecordStore<S>, action: Option<BudgetAction>) -> StatusMessage {
    let Some(BudgetAction::Set { value }) = action else {
        if store.budget_cap() == Amount::ZERO {
            return StatusMessage::info(budget_status(store));
        }

        return StatusMessage::info(format!("Budget cap: ${}\n{}", store.budget_cap().to_fixed(), budget_status(store)));
    };

    let applied = Amount::from_str(&value)
        .map_err(|error| error.to_string())
        .and_then(|cap| store.set_budget_cap(cap).map_err(|error| error.to_string()));

    match applied {
        Ok(()) => StatusMessage::info(format!("Budget cap updated successfully.\n{}", budget_status(store))),
        Err(reason) => {
            warn!("Rejected budget cap [{value}]: {reason}");
            StatusMessage::alert("Please enter a valid budget cap amount.")
        }
    }
}

fn rates<S: KeyValueStore>(store: &mut RecordStore<S>, action: Option<RatesAction>) -> StatusMessage {
    let Some(RatesAction::Set { usd, eur, gbp }) = action else {
        let current = store.exchange_rates();
        return StatusMessage::info(format!("USD: {}\nEUR: {}\nGBP: {}", current.usd, current.eur, current.gbp));
    };

    let rates = ExchangeRates {
        usd: rate_or_default(usd, DEFAULT_USD_RATE),
        eur: rate_or_default(eur, DEFAULT_EUR_RATE),
        gbp: rate_or_default(gbp, DEFAULT_GBP_RATE)
    };

    match store.set_exchange_rates(rates) {
        Ok(()) => StatusMessage::info("Exchange rates saved successfully."),
        Err(error) => StatusMessage::alert(error.to_string())
    }
}

fn rate_or_default(value: Option<f64>, default: f64) -> f64 {
    value.filter(|rate| *rate != 0.0 && !rate.is_nan()).unwrap_or(default)
}

async fn export<S: KeyValueStore>(store: &RecordStore<S>, path: &Path, format: FormatArg) -> StatusMessage {
    match write_export(path, store.list(), format.into()).await {
        Ok(()) => StatusMessage::info(format!("Data exported successfully to {}.", path.display())),
        Err(error) => StatusMessage::alert(format!("Export failed: {error}"))
    }
}

async fn import<S: KeyValueStore>(store: &mut RecordStore<S>, path: &Path) -> StatusMessage {
    match import_file(path).await {
        Ok(records) => {
            let count = records.len();
            store.replace_all(records);
            StatusMessage::info(format!("Data imported successfully ({count} records)."))
        }
        Err(error) => StatusMessage::alert(format!("Import failed: {error}"))
    }
}

fn form_errors(errors: &ValidationErrors) -> StatusMessage {
    let lines: Vec<String> = errors.values().map(ToString::to_string).collect();
    StatusMessage::alert(lines.join("\n"))
}
