use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::storage::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "expense-tracker", version, about = "Track personal expenses in a local data directory")]
pub struct Cli {
    /// Directory holding the stored records and settings
    #[arg(long, env = "EXPENSE_TRACKER_DATA_DIR", default_value = "expense-data", global = true)]
    pub data_dir: PathBuf,

    /// Log level written to stderr: error, warn, info, debug, trace
    #[arg(long, default_value = "error", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new record
    Add(RecordArgs),
    /// Replace fields of an existing record
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs
    },
    /// Delete a record by id
    Delete {
        id: String
    },
    /// List records, optionally filtered by a search pattern
    List {
        /// Case-insensitive regular expression matched against description, category, amount and date
        #[arg(long, default_value = "")]
        search: String,
        /// Sort field (description, amount, date). Repeat to flip the direction
        #[arg(long = "sort")]
        sort: Vec<String>
    },
    /// Show totals, top category and budget status
    Stats,
    /// Show or set the budget cap
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>
    },
    /// Show or set the stored exchange rates
    Rates {
        #[command(subcommand)]
        action: Option<RatesAction>
    },
    /// Write every record to a file
    Export {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg
    },
    /// Replace every record with the contents of a JSON export
    Import {
        path: PathBuf
    }
}

#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,
    #[arg(long)]
    pub category: String,
    /// Date as YYYY-MM-DD
    #[arg(long)]
    pub date: String
}

#[derive(Debug, Clone, Default, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<String>
}

#[derive(Debug, Subcommand)]
pub enum BudgetAction {
    /// Set the cap, 0 clears it
    Set {
        #[arg(allow_hyphen_values = true)]
        value: String
    }
}

#[derive(Debug, Subcommand)]
pub enum RatesAction {
    /// Save rates. Missing or zero values fall back to the defaults
    Set {
        #[arg(long, allow_negative_numbers = true)]
        usd: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        eur: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        gbp: Option<f64>
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv
        }
    }
}
