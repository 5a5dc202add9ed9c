// Global quota gate.
// Tracks the last known upstream quota and refuses work while it is exhausted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{BoardError, Result};
use crate::github::{DashboardSource, RateLimitState};

/// How far out a failed probe pushes the assumed reset, in seconds.
pub const FAIL_SAFE_SECS: i64 = 60 * 60;

/// Two-state gate: available while `remaining > 0`, exhausted otherwise.
pub struct RateLimitGuard {
    state: Mutex<Option<RateLimitState>>,
    clock: Arc<dyn Clock>,
    probe_timeout: Duration,
}

impl RateLimitGuard {
    pub fn new(probe_timeout: Duration) -> Self {
        Self::with_clock(probe_timeout, Arc::new(SystemClock))
    }

    pub fn with_clock(probe_timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(None),
            clock,
            probe_timeout,
        }
    }

    pub fn is_exhausted(state: &RateLimitState) -> bool {
        state.is_exhausted()
    }

    /// Last recorded quota, if any probe has run.
    pub fn current(&self) -> Option<RateLimitState> {
        self.lock().clone()
    }

    /// Ask upstream for the quota. Any transport failure yields the fail-safe
    /// exhausted state with a reset one hour from now.
    pub async fn probe<S: DashboardSource + ?Sized>(&self, source: &S) -> RateLimitState {
        let outcome = match tokio::time::timeout(self.probe_timeout, source.rate_limit()).await {
            Ok(result) => result,
            Err(_) => Err(BoardError::Timeout(self.probe_timeout)),
        };

        let state = match outcome {
            Ok(state) => {
                debug!(
                    remaining = state.remaining,
                    limit = state.limit,
                    "rate limit probed"
                );
                state
            }
            Err(e) => {
                warn!(error = %e, "rate limit probe failed, assuming exhausted");
                RateLimitState::exhausted_until(
                    self.clock.now() + chrono::Duration::seconds(FAIL_SAFE_SECS),
                )
            }
        };

        self.record(state.clone());
        state
    }

    /// Gate in front of upstream work.
    ///
    /// While the last known state is exhausted and its reset is still ahead, this
    /// refuses without touching the network. Otherwise it probes and refuses if the
    /// fresh state is exhausted.
    pub async fn ensure_available<S: DashboardSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<RateLimitState> {
        if let Some(known) = self.current() {
            if known.is_exhausted() && self.clock.now() < known.reset_at {
                debug!(reset_at = %known.reset_at, "quota exhausted, skipping probe");
                return Err(BoardError::RateLimited {
                    reset_at: known.reset_at,
                });
            }
        }

        let state = self.probe(source).await;
        if state.is_exhausted() {
            return Err(BoardError::RateLimited {
                reset_at: state.reset_at,
            });
        }
        Ok(state)
    }

    /// Overwrite the recorded quota.
    pub fn record(&self, state: RateLimitState) {
        *self.lock() = Some(state);
    }

    fn lock(&self) -> MutexGuard<'_, Option<RateLimitState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
