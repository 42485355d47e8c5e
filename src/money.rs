//! Money

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places currency amounts are kept at.
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to whole cents, half away from zero.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Errors raised when constructing a [`Percentage`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PercentageError {
    /// The value was outside `0..=100`.
    #[error("percentage must be between 0 and 100, got {0}")]
    OutOfRange(Decimal),
}

/// A discount percentage in the inclusive range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a percentage, rejecting values outside `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`PercentageError::OutOfRange`] for negative values or values above 100.
    pub fn new(value: Decimal) -> Result<Self, PercentageError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PercentageError::OutOfRange(value));
        }

        Ok(Self(value))
    }

    /// The raw value, e.g. `25` for 25%.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// `amount × self / 100`, rounded to cents after the multiplication.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        round2(amount * self.0 / Decimal::ONE_HUNDRED)
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = PercentageError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
