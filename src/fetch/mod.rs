pub mod collect;
pub mod context;
pub mod normalize;
pub mod orchestrator;
pub mod timeline;

#[cfg(test)]
pub(crate) mod fake;

pub use collect::{Collected, RepoBatch};
pub use context::{DashboardContext, PROJECTS_KEY};
pub use orchestrator::FetchOrchestrator;
pub use timeline::is_bot_login;
