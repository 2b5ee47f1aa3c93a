//! Background dataset refresh
//!
//! Optional periodic refresh, enabled via environment variable:
//!
//! - `INFLATRACK_REFRESH_HOURS`: Interval in hours (e.g., "24" for daily)
//!
//! Without it the dataset is only re-fetched lazily, when a request finds the
//! cache entry stale.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, warn};

use crate::AppState;

/// Configuration for scheduled refreshes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshScheduleConfig {
    /// Interval between refreshes in hours
    pub interval_hours: u64,
}

impl RefreshScheduleConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if scheduling is not configured (INFLATRACK_REFRESH_HOURS not set)
    pub fn from_env() -> Option<Self> {
        Self::parse(std::env::var("INFLATRACK_REFRESH_HOURS").ok().as_deref())
    }

    fn parse(raw: Option<&str>) -> Option<Self> {
        let interval_hours: u64 = raw.and_then(|s| s.trim().parse().ok())?;

        if interval_hours == 0 {
            warn!("INFLATRACK_REFRESH_HOURS is 0, scheduled refresh disabled");
            return None;
        }

        Some(Self { interval_hours })
    }
}

/// Start the refresh scheduler as a background task
pub fn start_refresh_scheduler(state: Arc<AppState>, config: RefreshScheduleConfig) {
    info!(
        "Starting refresh scheduler: every {} hours",
        config.interval_hours
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_hours * 3600));

        // Skip the first immediate tick; startup already loaded the data
        ticker.tick().await;

        loop {
            ticker.tick().await;

            info!("Running scheduled refresh...");

            match state.store.refresh().await {
                Ok(dataset) => {
                    info!("Scheduled refresh completed: {} records", dataset.len());
                }
                Err(e) => {
                    error!("Scheduled refresh failed: {}", e);
                }
            }
        }
    });
}
