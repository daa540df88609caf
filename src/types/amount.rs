use crate::types::errors::AmountError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{AddAssign, Sub};
use std::str::FromStr;
use tracing::error;

const DECIMAL_PLACES: u32 = 2;

/// A money value with at most two fraction digits.
///
/// Persisted and exported as a plain JSON number so files stay readable by
/// anything that understands the record layout.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Amount {
        Amount(self.0.abs())
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Renders with exactly two fraction digits, e.g. `12.50`.
    pub fn to_fixed(&self) -> String {
        let mut value = self.0.round_dp(DECIMAL_PLACES);
        value.rescale(DECIMAL_PLACES);
        value.to_string()
    }

    /// Parses loosely written stored values, rounding extra fraction digits
    /// half away from zero (`100.125` becomes `100.13`).
    pub fn parse_rounded(value: &str) -> Result<Amount, AmountError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(AmountError::InvalidFormat("Value is an empty string".to_string()));
        }

        let decimal = Decimal::from_str(value)?
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

        if !is_exact_as_f64(decimal) {
            return Err(AmountError::PrecisionLoss(value.to_string()));
        }

        Ok(Amount(decimal))
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl AddAssign<Amount> for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        if let Some(new_val) = self.checked_add(rhs) {
            self.0 = new_val.0;
        } else {
            error!("Amount AddAssign error: Overflow")
        }
    }
}

impl Sub<Amount> for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        self.checked_sub(rhs).unwrap_or_else(|| {
            error!("Amount Sub error: Overflow");
            self
        })
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |mut total, amount| {
            total += amount;
            total
        })
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Plain decimal text without trailing zeros (`10`, `12.5`), the form search
/// patterns are matched against.
impl Display for Amount {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.normalize())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(AmountError::InvalidFormat("Value is an empty string".to_string()));
        }

        let decimal = Decimal::from_str(value)?;

        if decimal.scale() > DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimalPlaces(DECIMAL_PLACES));
        }

        if !is_exact_as_f64(decimal) {
            return Err(AmountError::PrecisionLoss(value.to_string()));
        }

        Ok(Amount(decimal))
    }
}

/// Amounts are persisted as JSON numbers, so only values an `f64` carries
/// without change are representable.
fn is_exact_as_f64(decimal: Decimal) -> bool {
    f64::from_str(&decimal.normalize().to_string())
        .ok()
        .filter(|value| value.is_finite())
        .and_then(|value| Decimal::from_str(&value.to_string()).ok())
        .is_some_and(|back| back == decimal)
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        //NOTE: Going through the decimal text yields the nearest f64, so `12.34` is written back as `12.34`
        let value = f64::from_str(&self.to_string()).map_err(ser::Error::custom)?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl de::Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("a number")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Decimal::from_str(&value.to_string())
            .map(Amount)
            .map_err(|_| E::invalid_value(de::Unexpected::Float(value), &self))
    }
}
