// Per-repository result collection.
// Keeps successes and failures side by side so nothing is silently dropped.

use tracing::warn;

use crate::error::{BoardError, Result};
use crate::model::{Resource, SubresourceFailure};

/// Items fetched for one repository.
#[derive(Debug, Clone)]
pub struct RepoBatch<T> {
    pub repository: String,
    pub items: Vec<T>,
}

/// Outcome of a fan-out across repositories.
#[derive(Debug, Clone)]
pub struct Collected<T> {
    pub succeeded: Vec<RepoBatch<T>>,
    pub failed: Vec<SubresourceFailure>,
}

impl<T> Collected<T> {
    /// Split raw per-repository results, logging each failure.
    pub fn from_results(resource: Resource, results: Vec<(String, Result<Vec<T>>)>) -> Self {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for (repository, result) in results {
            match result {
                Ok(items) => succeeded.push(RepoBatch { repository, items }),
                Err(e) => failed.push(failure(&repository, resource, &e)),
            }
        }

        Self { succeeded, failed }
    }

    pub fn any_quota_related(&self) -> bool {
        self.failed.iter().any(|f| f.quota_related)
    }

    pub fn failed_repositories(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|f| f.repository.as_str())
    }

    /// Total items across successful repositories.
    pub fn item_count(&self) -> usize {
        self.succeeded.iter().map(|b| b.items.len()).sum()
    }
}

/// Record an absorbed failure.
pub fn failure(repository: &str, resource: Resource, error: &BoardError) -> SubresourceFailure {
    warn!(
        repository,
        resource = resource.as_str(),
        error = %error,
        "subresource unavailable, continuing without it"
    );
    SubresourceFailure {
        repository: repository.to_string(),
        resource,
        error: error.to_string(),
        quota_related: is_quota_related(error),
    }
}

/// Whether an error hints that the quota ran out, including secondary limits that
/// surface as a plain 403.
pub fn is_quota_related(error: &BoardError) -> bool {
    match error {
        BoardError::RateLimited { .. } => true,
        BoardError::Other(message) | BoardError::GraphQl(message) => {
            message.to_ascii_lowercase().contains("rate limit")
        }
        _ => false,
    }
}
