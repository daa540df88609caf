mod cli;
mod commands;
mod status;
#[cfg(test)]
mod tests;

pub use cli::{BudgetAction, Cli, Command, EditArgs, FormatArg, RatesAction, RecordArgs};
pub use commands::execute;
pub use status::StatusMessage;
