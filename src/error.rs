// Error types for boardwatch.
// Handles GitHub API errors, configuration errors, and orchestration outcomes.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {}", reset_at.format("%H:%M:%S"))]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Missing GITHUB_TOKEN environment variable and no stored token")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl BoardError {
    /// True for the one error kind that crosses the orchestrator boundary.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BoardError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rate_limited_display_includes_reset_time() {
        let reset_at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        let err = BoardError::RateLimited { reset_at };
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "Rate limit exceeded, resets at 14:05:09");
    }

    #[test]
    fn test_other_errors_are_not_rate_limited() {
        assert!(!BoardError::Unauthorized.is_rate_limited());
        assert!(!BoardError::Timeout(Duration::from_secs(3)).is_rate_limited());
        assert!(!BoardError::Other("boom".into()).is_rate_limited());
    }
}
