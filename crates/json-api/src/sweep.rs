//! Promotion status sweep
//!
//! Stored promotion statuses drift as windows open and close. The sweep
//! rewrites every stale status on a fixed interval.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use bazaar::promotions::sync::SyncReport;
use bazaar_app::domain::promotions::{PromotionsService, PromotionsServiceError};

/// Spawn the sweep as a background task.
pub(crate) fn spawn(promotions: Arc<dyn PromotionsService>, interval: Duration) -> JoinHandle<()> {
    info!(
        interval_seconds = interval.as_secs(),
        "spawning promotion status sweep"
    );

    tokio::spawn(run(promotions, interval))
}

#[expect(
    clippy::infinite_loop,
    reason = "the sweep runs until the runtime shuts down"
)]
async fn run(promotions: Arc<dyn PromotionsService>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(error) = sweep_once(promotions.as_ref(), Timestamp::now()).await {
            error!(error = %error, "promotion status sweep failed");
        }
    }
}

/// Run one pass and log what changed.
///
/// # Errors
///
/// Returns the service error when the pass could not complete.
#[instrument(name = "promotions.sweep", skip(promotions))]
pub(crate) async fn sweep_once(
    promotions: &dyn PromotionsService,
    now: Timestamp,
) -> Result<SyncReport, PromotionsServiceError> {
    let report = promotions.sync_statuses(now).await?;

    for change in &report.changes {
        debug!(
            promotion_id = %change.promotion_id,
            name = %change.name,
            from = change.from.as_str(),
            to = change.to.as_str(),
            "promotion status changed"
        );
    }

    if report.updated() > 0 {
        info!(
            total = report.total,
            updated = report.updated(),
            "promotion statuses synced"
        );
    } else {
        debug!(total = report.total, "promotion statuses already in sync");
    }

    Ok(report)
}
