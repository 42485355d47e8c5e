//! Field validation

use rust_decimal::Decimal;
use thiserror::Error;

/// A field failed a schema constraint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty
    #[error("{field} is required")]
    Required {
        /// Field name
        field: &'static str,
    },

    /// Text shorter than the minimum length
    #[error("{field} must be at least {min} characters long")]
    TooShort {
        /// Field name
        field: &'static str,
        /// Minimum number of characters
        min: usize,
    },

    /// Text longer than the maximum length
    #[error("{field} cannot exceed {max} characters")]
    TooLong {
        /// Field name
        field: &'static str,
        /// Maximum number of characters
        max: usize,
    },

    /// A number below zero
    #[error("{field} cannot be negative")]
    Negative {
        /// Field name
        field: &'static str,
    },

    /// A number outside an inclusive range
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Lower bound
        min: Decimal,
        /// Upper bound
        max: Decimal,
    },

    /// Quantities start at one
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// A window whose end is not after its start
    #[error("End date must be after start date")]
    EndBeforeStart,
}

/// Check a trimmed text field's length in characters.
///
/// # Errors
///
/// Returns [`ValidationError::Required`], [`ValidationError::TooShort`] or
/// [`ValidationError::TooLong`].
pub fn text(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();

    if len == 0 && min > 0 {
        return Err(ValidationError::Required { field });
    }

    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }

    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

/// Check an optional text field's maximum length.
///
/// # Errors
///
/// Returns [`ValidationError::TooLong`].
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if value.trim().chars().count() > max => {
            Err(ValidationError::TooLong { field, max })
        }
        _ => Ok(()),
    }
}

/// Check a decimal is not negative.
///
/// # Errors
///
/// Returns [`ValidationError::Negative`].
pub fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative { field });
    }

    Ok(())
}

/// Check a decimal lies within `min..=max`.
///
/// # Errors
///
/// Returns [`ValidationError::OutOfRange`].
pub fn range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_counts_characters_not_bytes() {
        assert_eq!(text("name", "ấn", 2, 100), Ok(()));
        assert_eq!(
            text("name", "x", 2, 100),
            Err(ValidationError::TooShort {
                field: "name",
                min: 2
            })
        );
        assert_eq!(
            text("name", "   ", 2, 100),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn text_rejects_long_values() {
        let long = "a".repeat(101);

        assert_eq!(
            text("name", &long, 2, 100),
            Err(ValidationError::TooLong {
                field: "name",
                max: 100
            })
        );
    }

    #[test]
    fn optional_text_allows_missing_values() {
        assert_eq!(optional_text("description", None, 500), Ok(()));
        assert!(optional_text("description", Some(&"a".repeat(501)), 500).is_err());
    }

    #[test]
    fn numbers_are_bounded() {
        assert!(non_negative("price", Decimal::NEGATIVE_ONE).is_err());
        assert!(non_negative("price", Decimal::ZERO).is_ok());
        assert!(range("rating", Decimal::from(6), Decimal::ZERO, Decimal::from(5)).is_err());
        assert!(range("rating", Decimal::from(5), Decimal::ZERO, Decimal::from(5)).is_ok());
    }
}
