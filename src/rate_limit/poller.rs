// Quota poller.
// Background task that re-probes the upstream quota on a fixed period.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::fetch::DashboardContext;
use crate::github::DashboardSource;

/// Spawns a task that probes the quota every `interval` until `cancel` fires.
///
/// The first probe runs immediately so the UI has a quota to show on startup.
pub fn spawn_rate_limit_poller<S: DashboardSource>(
    ctx: Arc<DashboardContext>,
    source: Arc<S>,
    interval: Duration,
    cancel: CancelToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting rate limit poller with interval of {} seconds",
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("rate limit poller stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let state = ctx.guard.probe(source.as_ref()).await;
                    debug!(remaining = state.remaining, "scheduled quota probe");
                }
            }
        }
    })
}
