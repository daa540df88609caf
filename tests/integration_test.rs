use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use tempfile::tempdir;

fn run_cli(data_dir: &Path, args: &[&str]) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_expense-tracker");

    let output = Command::new(binary_path)
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("EXPENSE_TRACKER_DATA_DIR")
        .output()?;

    Ok(output)
}

fn add_args<'a>(description: &'a str, amount: &'a str, category: &'a str, date: &'a str) -> Vec<&'a str> {
    vec!["add", "--description", description, "--amount", amount, "--category", category, "--date", date]
}

#[test]
fn test_cli_persists_records_between_runs() -> Result<()> {
    let directory = tempdir()?;
    let data_dir = directory.path().join("data");

    let added = run_cli(&data_dir, &add_args("Coffee beans", "12.50", "Food", "2024-03-01"))?;

    assert!(added.status.success());
    assert!(String::from_utf8(added.stdout)?.starts_with("Added record txn_"));
    assert!(data_dir.join("records.json").exists());

    let listed = run_cli(&data_dir, &["list"])?;

    assert!(listed.status.success());

    let stdout = String::from_utf8(listed.stdout)?;
    let mut lines = stdout.lines();

    assert!(lines.next().is_some_and(|header| header.starts_with("ID")));
    assert!(lines.next().is_some_and(|row| row.contains("Coffee beans") && row.contains("$12.50")));
    assert_eq!(lines.next(), Some("1 of 1 records"));

    Ok(())
}

#[test]
fn test_cli_rejects_invalid_input_with_failure_status() -> Result<()> {
    let directory = tempdir()?;

    let output = run_cli(directory.path(), &add_args("Lunch", "05", "Food", "2024-03-01"))?;

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("Amount: must be a valid number with max 2 decimal places"));
    assert!(!directory.path().join("records.json").exists());

    Ok(())
}

#[test]
fn test_cli_reports_budget_overrun_in_stats() -> Result<()> {
    let directory = tempdir()?;

    run_cli(directory.path(), &add_args("Groceries", "10", "Food", "2024-01-01"))?;
    run_cli(directory.path(), &add_args("Dinner", "20", "Food", "2024-01-02"))?;

    let budget = run_cli(directory.path(), &["budget", "set", "25"])?;
    assert!(budget.status.success());

    let stats = run_cli(directory.path(), &["stats"])?;
    let stdout = String::from_utf8(stats.stdout)?;

    assert!(stdout.contains("Total amount: $30.00"));
    assert!(stdout.contains("Over budget by: $5.00"));
    assert_eq!(std::fs::read_to_string(directory.path().join("cap.json"))?, "25");

    Ok(())
}

#[test]
fn test_cli_export_and_import_round_trip() -> Result<()> {
    let source = tempdir()?;
    let target = tempdir()?;
    let export_path = source.path().join("expense-records.json");
    let export_arg = export_path.to_string_lossy().to_string();

    run_cli(source.path(), &add_args("Textbook", "89.99", "Books", "2024-02-20"))?;
    run_cli(source.path(), &add_args("Bus pass", "40", "Transport", "2024-02-21"))?;

    let exported = run_cli(source.path(), &["export", &export_arg])?;
    assert!(exported.status.success());

    let imported = run_cli(target.path(), &["import", &export_arg])?;
    assert!(imported.status.success());

    let source_records: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(source.path().join("records.json"))?)?;
    let target_records: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(target.path().join("records.json"))?)?;

    assert_eq!(source_records, target_records);
    assert_eq!(target_records.as_array().map(Vec::len), Some(2));

    Ok(())
}

#[test]
fn test_cli_import_rejects_non_array_documents() -> Result<()> {
    let directory = tempdir()?;
    let import_path = directory.path().join("bad.json");
    std::fs::write(&import_path, r#"{"records": []}"#)?;

    let output = run_cli(directory.path(), &["import", &import_path.to_string_lossy()])?;

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("File must contain an array of records"));

    Ok(())
}
