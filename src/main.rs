use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use expense_tracker::app::{execute, Cli};
use expense_tracker::storage::FileStorage;
use expense_tracker::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    debug!("Using data directory {}", cli.data_dir.display());

    let mut store = RecordStore::open(FileStorage::new(cli.data_dir));
    let status = execute(&mut store, cli.command).await?;

    if status.urgent {
        eprintln!("{}", status.text);
        exit(1);
    }

    let mut output = BufWriter::new(stdout().lock());
    writeln!(output, "{}", status.text)?;
    output.flush()?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries command output, logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
