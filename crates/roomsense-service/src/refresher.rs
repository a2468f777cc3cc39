//! Background refresh loop.
//!
//! Once per configured interval the refresher pulls the live states and
//! each sensor's history since the start of the monitoring day, hands both
//! to the store, and lets it evaluate and publish a fresh snapshot. When
//! either source fails the store is refreshed with synthetic data instead,
//! so the dashboard keeps rendering through outages.

use std::sync::Arc;
use std::time::Duration;

use time::{OffsetDateTime, PrimitiveDateTime, Time};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::SourceResult;
use crate::state::AppState;

/// Background refresher that feeds the sensor store.
pub struct Refresher {
    state: Arc<AppState>,
}

impl Refresher {
    /// Create a new refresher.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Start refreshing on the configured interval.
    ///
    /// Returns immediately; refreshing happens on a background task. The
    /// first tick fires at once, so a snapshot is available shortly after
    /// startup.
    pub fn start(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let interval = Duration::from_secs(state.config.refresh.interval_secs);
        info!(interval_secs = interval.as_secs(), "starting refresher");

        tokio::spawn(async move {
            run(state, interval).await;
        })
    }
}

async fn run(state: Arc<AppState>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    let mut consecutive_failures = 0u32;

    loop {
        ticker.tick().await;
        let now = OffsetDateTime::now_utc();

        match refresh_once(&state, now).await {
            Ok((live, batches)) => {
                consecutive_failures = 0;
                debug!(live, batches, "refresh tick complete");
            }
            Err(e) => {
                consecutive_failures += 1;
                if consecutive_failures <= 3 {
                    warn!(%e, attempt = consecutive_failures, "source refresh failed, using synthetic data");
                } else if consecutive_failures == 4 {
                    error!(
                        %e,
                        "source refresh failed {consecutive_failures} times, will continue trying silently"
                    );
                }
                // The sources may come back; meanwhile keep the dashboard fed
                state.store.refresh_synthetic(now).await;
            }
        }
    }
}

/// One refresh tick: fetch both sources and hand the data to the store.
async fn refresh_once(state: &AppState, now: OffsetDateTime) -> SourceResult<(usize, usize)> {
    let live = state.live.fetch().await?;

    let since = day_start(now, state.config.refresh.history_start_hour);
    let history = state.history.fetch_all(&state.entities, since).await?;

    let counts = (live.len(), history.len());
    state.store.refresh(live, history, now).await;
    Ok(counts)
}

/// The start of the monitoring day: today at `hour`:00 UTC.
fn day_start(now: OffsetDateTime, hour: u8) -> OffsetDateTime {
    let time = Time::from_hms(hour, 0, 0).unwrap_or(Time::MIDNIGHT);
    PrimitiveDateTime::new(now.date(), time).assume_utc()
}
