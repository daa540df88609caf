use rust_decimal::Error as DecimalError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Amount error: {0}")]
    InvalidFormat(String),
    #[error("Amount error: {0}")]
    Decimal(#[from] DecimalError),
    #[error("Amount error: more than {0} decimal places")]
    TooManyDecimalPlaces(u32),
    #[error("Amount error: [{0}] has too many significant digits to store exactly")]
    PrecisionLoss(String)
}
