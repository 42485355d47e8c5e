//! Promotion status sweep

use jiff::Timestamp;
use serde::Serialize;

use crate::promotions::{Promotion, PromotionId, PromotionStatus};

/// A persisted status the sweep will overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// Promotion being corrected
    pub promotion_id: PromotionId,

    /// Promotion name, for reporting
    pub name: String,

    /// Persisted status before the sweep
    pub from: PromotionStatus,

    /// Live status written by the sweep
    pub to: PromotionStatus,
}

/// Outcome of one sweep: how many promotions were examined and which changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Promotions examined
    pub total: usize,

    /// Status writes performed
    pub changes: Vec<StatusChange>,
}

impl SyncReport {
    /// Number of promotions whose status was rewritten.
    pub fn updated(&self) -> usize {
        self.changes.len()
    }
}

/// Work out which persisted statuses disagree with the clock at `now`.
///
/// Admin overrides are not preserved: a promotion pinned to `inactive` while
/// its window is open is scheduled back to `active`.
pub fn plan_sync<'a>(
    promotions: impl IntoIterator<Item = &'a Promotion>,
    now: Timestamp,
) -> SyncReport {
    let mut report = SyncReport::default();

    for promotion in promotions {
        report.total += 1;

        let live = promotion.live_status(now);

        if promotion.status != live {
            report.changes.push(StatusChange {
                promotion_id: promotion.id,
                name: promotion.name.clone(),
                from: promotion.status,
                to: live,
            });
        }
    }

    report
}
