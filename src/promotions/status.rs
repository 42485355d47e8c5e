//! Promotion Status Resolution

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a promotion, derived from its window and the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    /// The window has not opened yet
    #[default]
    Inactive,

    /// The window is open
    Active,

    /// The window has closed
    Expired,
}

impl PromotionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Inactive, Self::Active, Self::Expired];

    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised promotion status value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid promotion status: {0}")]
pub struct InvalidPromotionStatus(pub String);

impl FromStr for PromotionStatus {
    type Err = InvalidPromotionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidPromotionStatus(s.to_string()))
    }
}

/// Resolve the status of the window `starts_at..=ends_at` at `now`.
///
/// Both bounds are inclusive: a promotion is active at the exact instant it
/// starts and at the exact instant it ends.
pub fn resolve_status(starts_at: Timestamp, ends_at: Timestamp, now: Timestamp) -> PromotionStatus {
    if now < starts_at {
        PromotionStatus::Inactive
    } else if now > ends_at {
        PromotionStatus::Expired
    } else {
        PromotionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn resolves_each_side_of_the_window() -> TestResult {
        let start: Timestamp = "2025-01-01T00:00:00Z".parse()?;
        let end: Timestamp = "2025-01-31T00:00:00Z".parse()?;

        assert_eq!(
            resolve_status(start, end, start.checked_sub(1.second())?),
            PromotionStatus::Inactive
        );
        assert_eq!(resolve_status(start, end, start), PromotionStatus::Active);
        assert_eq!(
            resolve_status(start, end, start.checked_add(240.hours())?),
            PromotionStatus::Active
        );
        assert_eq!(resolve_status(start, end, end), PromotionStatus::Active);
        assert_eq!(
            resolve_status(start, end, end.checked_add(1.nanosecond())?),
            PromotionStatus::Expired
        );

        Ok(())
    }

    #[test]
    fn resolution_is_total_over_a_sweep_of_instants() -> TestResult {
        let start: Timestamp = "2025-03-10T12:00:00Z".parse()?;
        let end = start.checked_add(48.hours())?;
        let mut now = start.checked_sub(24.hours())?;

        let mut seen = Vec::new();

        while now <= end.checked_add(24.hours())? {
            let status = resolve_status(start, end, now);

            if seen.last() != Some(&status) {
                seen.push(status);
            }

            now = now.checked_add(6.hours())?;
        }

        assert_eq!(
            seen,
            vec![
                PromotionStatus::Inactive,
                PromotionStatus::Active,
                PromotionStatus::Expired
            ]
        );

        Ok(())
    }

    #[test]
    fn parses_known_statuses_only() {
        assert_eq!("active".parse::<PromotionStatus>(), Ok(PromotionStatus::Active));
        assert_eq!(
            "paused".parse::<PromotionStatus>(),
            Err(InvalidPromotionStatus("paused".to_string()))
        );
    }
}
