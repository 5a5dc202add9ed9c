// Organization project dashboard.
// Cached, quota-aware loading of GitHub project boards, issues and activity.

pub mod app;
pub mod cache;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod github;
pub mod logging;
pub mod model;
pub mod paths;
pub mod rate_limit;
pub mod state;
pub mod ui;

pub use error::{BoardError, Result};
