use super::cli::{BudgetAction, Command, EditArgs, FormatArg, RatesAction, RecordArgs};
use super::{execute, StatusMessage};

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tempfile::tempdir;

use crate::app::Cli;
use crate::storage::MemoryStorage;
use crate::store::RecordStore;
use crate::types::Amount;

fn add_command(description: &str, amount: &str, category: &str, date: &str) -> Command {
    Command::Add(RecordArgs {
        description: description.to_string(),
        amount: amount.to_string(),
        category: category.to_string(),
        date: date.to_string()
    })
}

fn list_command(search: &str, sort: &[&str]) -> Command {
    Command::List {
        search: search.to_string(),
        sort: sort.iter().map(|name| name.to_string()).collect()
    }
}

async fn run(store: &mut RecordStore<Arc<MemoryStorage>>, command: Command) -> Result<StatusMessage> {
    execute(store, command).await
}

#[tokio::test]
async fn test_add_rejects_invalid_fields_with_every_message() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));

    let status = run(&mut store, add_command("hi hi", "05", "Food99", "2023-02-30")).await?;

    assert!(status.urgent);
    assert!(status.text.contains("Description: contains duplicate consecutive words"));
    assert!(status.text.contains("Amount: must be a valid number with max 2 decimal places"));
    assert!(status.text.contains("Category: only letters, spaces, and hyphens allowed"));
    assert!(status.text.contains("Date: invalid calendar date"));
    assert!(store.list().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_add_with_overlong_amount_is_a_form_error() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));

    for amount in ["123456789012345678901234567890", "12345678901234567.89"] {
        let status = run(&mut store, add_command("Lunch", amount, "Food", "2024-03-01")).await?;

        assert!(status.urgent);
        assert_eq!(status.text, "Amount: must be a valid number with max 2 decimal places");
    }

    assert!(store.list().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_add_then_list_highlights_matches() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));

    let status = run(&mut store, add_command("Coffee beans", "12.50", "Food", "2024-03-01")).await?;
    assert!(!status.urgent);

    run(&mut store, add_command("Bus pass", "40", "Transport", "2024-03-02")).await?;

    let listing = run(&mut store, list_command("coffee", &[])).await?;

    assert!(listing.text.contains("<mark>Coffee</mark> beans"));
    assert!(listing.text.contains("$12.50"));
    assert!(!listing.text.contains("Bus pass"));
    assert!(listing.text.ends_with("1 of 2 records"));

    Ok(())
}

#[tokio::test]
async fn test_list_with_malformed_search_shows_nothing() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut store, add_command("Coffee beans", "12.50", "Food", "2024-03-01")).await?;

    let listing = run(&mut store, list_command("[", &[])).await?;

    assert!(!listing.urgent);
    assert_eq!(listing.text, "No records found (0 of 1)");

    Ok(())
}

#[tokio::test]
async fn test_list_sort_ignores_unknown_fields() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut store, add_command("Lunch", "12", "Food", "2024-03-01")).await?;
    run(&mut store, add_command("Rent", "800", "Housing", "2024-03-05")).await?;

    run(&mut store, list_command("", &["amount", "category"])).await?;

    let settings = store.settings();
    assert_eq!(settings.sort_field.to_string(), "amount");
    assert!(settings.sort_ascending);

    Ok(())
}

#[tokio::test]
async fn test_edit_updates_record_and_reports_missing_ids() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut store, add_command("Lunch", "12", "Food", "2024-03-01")).await?;
    let id = store.list()[0].id.clone();

    let fields = EditArgs {
        amount: Some("15.75".to_string()),
        ..EditArgs::default()
    };
    let status = run(&mut store, Command::Edit { id: id.clone(), fields }).await?;

    assert!(!status.urgent);
    assert_eq!(store.list()[0].amount.to_fixed(), "15.75");
    assert_eq!(store.list()[0].description, "Lunch");

    let fields = EditArgs {
        amount: Some("1".to_string()),
        ..EditArgs::default()
    };
    let missing = run(&mut store, Command::Edit { id: "txn_missing".to_string(), fields }).await?;

    assert!(missing.urgent);
    assert!(missing.text.contains("txn_missing"));

    let invalid = EditArgs {
        date: Some("2024-13-01".to_string()),
        ..EditArgs::default()
    };
    let rejected = run(&mut store, Command::Edit { id: id.clone(), fields: invalid }).await?;

    assert!(rejected.urgent);
    assert_eq!(rejected.text, "Date: use YYYY-MM-DD format");

    let empty = run(&mut store, Command::Edit { id, fields: EditArgs::default() }).await?;
    assert!(empty.urgent);

    Ok(())
}

#[tokio::test]
async fn test_delete_is_not_an_error_for_missing_ids() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));

    let status = run(&mut store, Command::Delete { id: "txn_missing".to_string() }).await?;

    assert!(!status.urgent);

    Ok(())
}

#[tokio::test]
async fn test_budget_reports_over_budget_state() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut store, add_command("Groceries", "10", "Food", "2024-01-01")).await?;
    run(&mut store, add_command("Dinner", "20", "Food", "2024-01-02")).await?;

    let status = run(&mut store, Command::Budget { action: Some(BudgetAction::Set { value: "25".to_string() }) }).await?;

    assert!(!status.urgent);
    assert!(status.text.contains("Over budget by: $5.00"));
    assert_eq!(store.budget_cap(), Amount::from(25));

    let stats = run(&mut store, Command::Stats).await?;

    assert!(stats.text.contains("Total records: 2"));
    assert!(stats.text.contains("Total amount: $30.00"));
    assert!(stats.text.contains("Top category: Food"));

    Ok(())
}

#[tokio::test]
async fn test_budget_rejects_invalid_caps() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));

    for value in ["-5", "abc", "1.234"] {
        let status = run(&mut store, Command::Budget { action: Some(BudgetAction::Set { value: value.to_string() }) }).await?;

        assert!(status.urgent);
        assert_eq!(status.text, "Please enter a valid budget cap amount.");
    }

    assert_eq!(store.budget_cap(), Amount::ZERO);

    Ok(())
}

#[tokio::test]
async fn test_rates_fall_back_to_defaults_and_reject_negatives() -> Result<()> {
    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));

    let saved = run(&mut store, Command::Rates { action: Some(RatesAction::Set { usd: None, eur: Some(0.9), gbp: Some(0.0) }) }).await?;

    assert!(!saved.urgent);
    assert_eq!(store.exchange_rates().usd, 1.0);
    assert_eq!(store.exchange_rates().eur, 0.9);
    assert_eq!(store.exchange_rates().gbp, 0.73);

    let rejected = run(&mut store, Command::Rates { action: Some(RatesAction::Set { usd: Some(-1.0), eur: None, gbp: None }) }).await?;

    assert!(rejected.urgent);
    assert_eq!(store.exchange_rates().eur, 0.9);

    Ok(())
}

#[tokio::test]
async fn test_export_then_import_restores_collection() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("expense-records.json");

    let mut source = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut source, add_command("Lunch", "12.50", "Food", "2024-03-01")).await?;
    run(&mut source, add_command("Textbook", "89.99", "Books", "2024-03-02")).await?;

    let exported = run(&mut source, Command::Export { path: path.clone(), format: FormatArg::Json }).await?;
    assert!(!exported.urgent);

    let mut target = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut target, add_command("Old entry", "1", "Misc", "2024-01-01")).await?;

    let imported = run(&mut target, Command::Import { path }).await?;

    assert!(!imported.urgent);
    assert_eq!(target.list(), source.list());

    Ok(())
}

#[tokio::test]
async fn test_failed_import_leaves_collection_untouched() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("broken.json");
    std::fs::write(&path, r#"[{"id": 1}]"#)?;

    let mut store = RecordStore::open(Arc::new(MemoryStorage::new()));
    run(&mut store, add_command("Lunch", "12.50", "Food", "2024-03-01")).await?;
    let before = store.list().to_vec();

    let status = run(&mut store, Command::Import { path }).await?;

    assert!(status.urgent);
    assert!(status.text.starts_with("Import failed:"));
    assert_eq!(store.list(), before.as_slice());

    Ok(())
}

#[test]
fn test_cli_parses_repeated_sort_flags_and_global_options() -> Result<()> {
    let cli = Cli::try_parse_from([
        "expense-tracker", "--data-dir", "/tmp/expenses", "list", "--search", "food", "--sort", "amount", "--sort", "amount",
    ])?;

    assert_eq!(cli.data_dir.to_string_lossy(), "/tmp/expenses");

    match cli.command {
        Command::List { search, sort } => {
            assert_eq!(search, "food");
            assert_eq!(sort, vec!["amount", "amount"]);
        }
        other => return Err(anyhow!("unexpected command: {other:?}"))
    }

    Ok(())
}
