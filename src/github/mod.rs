// GitHub API module.
// Provides the client, wire types, and the data-source trait the orchestrator consumes.

pub mod client;
pub mod endpoints;
pub mod source;
pub mod types;

pub use client::GitHubClient;
pub use source::DashboardSource;
pub use types::*;
