//! Order numbers
//!
//! Format: `ORD-YYYYMMDD-NNNN`, where `NNNN` is a per-day sequence starting
//! at `0001`. Dates are taken in UTC.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PREFIX: &str = "ORD";

/// Highest sequence a single day can reach.
pub const MAX_DAILY_SEQUENCE: u16 = 9_999;

/// Errors raised while parsing or allocating order numbers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    /// Not of the form `ORD-YYYYMMDD-NNNN`.
    #[error("malformed order number: {0}")]
    Malformed(String),

    /// The sequence is outside `1..=9999`.
    #[error("order sequence {0} is out of range")]
    SequenceOutOfRange(u32),

    /// All numbers for the day are taken.
    #[error("order numbers exhausted for {0}")]
    Exhausted(Date),
}

/// Human-readable order number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber {
    date: Date,
    sequence: u16,
}

impl OrderNumber {
    /// Number `sequence` on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::SequenceOutOfRange`] unless `1 <= sequence <= 9999`.
    pub fn new(date: Date, sequence: u16) -> Result<Self, OrderNumberError> {
        if sequence == 0 || sequence > MAX_DAILY_SEQUENCE {
            return Err(OrderNumberError::SequenceOutOfRange(u32::from(sequence)));
        }

        Ok(Self { date, sequence })
    }

    /// The UTC calendar date an order placed at `now` is numbered under.
    pub fn date_of(now: Timestamp) -> Date {
        now.to_zoned(TimeZone::UTC).date()
    }

    /// `ORD-YYYYMMDD`, shared by every number on `date`.
    pub fn day_prefix(date: Date) -> String {
        format!(
            "{PREFIX}-{:04}{:02}{:02}",
            date.year(),
            date.month(),
            date.day()
        )
    }

    /// The number after `last` on `date`, or the first of the day.
    ///
    /// `last` is the highest number already issued for `date`; numbers from
    /// other days are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::Exhausted`] once `9999` has been issued.
    pub fn next(date: Date, last: Option<&Self>) -> Result<Self, OrderNumberError> {
        let sequence = match last {
            Some(last) if last.date == date => last
                .sequence
                .checked_add(1)
                .filter(|next| *next <= MAX_DAILY_SEQUENCE)
                .ok_or(OrderNumberError::Exhausted(date))?,
            _ => 1,
        };

        Self::new(date, sequence)
    }

    /// Calendar date of the order.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Sequence within the day.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", Self::day_prefix(self.date), self.sequence)
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OrderNumberError::Malformed(s.to_string());

        let mut parts = s.split('-');

        let (Some(PREFIX), Some(day), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        if day.len() != 8 || sequence.len() != 4 {
            return Err(malformed());
        }

        let date = Date::strptime("%Y%m%d", day).map_err(|_err| malformed())?;
        let sequence: u16 = sequence.parse().map_err(|_err| malformed())?;

        Self::new(date, sequence)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.to_string()
    }
}
