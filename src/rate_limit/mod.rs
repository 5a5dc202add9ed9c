// Rate limit module.
// Quota gate plus the background task that keeps it fresh.

pub mod guard;
pub mod poller;

pub use guard::{FAIL_SAFE_SECS, RateLimitGuard};
pub use poller::spawn_rate_limit_poller;
