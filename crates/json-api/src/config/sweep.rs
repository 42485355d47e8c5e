//! Promotion Sweep Config

use std::time::Duration;

use clap::{ArgAction, Args};

/// Periodic promotion status sweep settings.
#[derive(Debug, Args)]
pub struct SweepConfig {
    /// Seconds between promotion status sweeps.
    #[arg(long, env = "PROMOTION_SWEEP_INTERVAL_SECONDS", default_value_t = 60_u64)]
    pub promotion_sweep_interval_seconds: u64,

    /// Run the promotion status sweep in the background.
    #[arg(
        long,
        env = "PROMOTION_SWEEP_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub promotion_sweep_enabled: bool,
}

impl SweepConfig {
    /// Interval between sweeps, never shorter than one second.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.promotion_sweep_interval_seconds.max(1))
    }
}
