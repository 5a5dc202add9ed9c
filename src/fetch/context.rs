// Shared fetch context.
// Owns the project cache and the quota gate; handed to whatever issues fetches.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheCoordinator;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::model::Project;
use crate::rate_limit::RateLimitGuard;

/// Cache key for the project-board aggregate.
pub const PROJECTS_KEY: &str = "projects";

pub struct DashboardContext {
    pub cache: CacheCoordinator<Vec<Project>>,
    pub guard: RateLimitGuard,
    pub clock: Arc<dyn Clock>,
}

impl DashboardContext {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(
            config.cache_ttl,
            config.request_timeout,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(cache_ttl: Duration, probe_timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: CacheCoordinator::with_clock(cache_ttl, clock.clone()),
            guard: RateLimitGuard::with_clock(probe_timeout, clock.clone()),
            clock,
        }
    }
}
