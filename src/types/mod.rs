mod amount;
mod errors;

use chrono::{DateTime, Utc};

pub use amount::Amount;
pub use errors::AmountError;

pub type RecordId = String;
pub type Timestamp = DateTime<Utc>;
