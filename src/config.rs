// Configuration.
// Loads dashboard settings from environment variables and resolves the API token.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{BoardError, Result};
use crate::paths;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_RATE_POLL: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization whose boards and repositories are shown.
    pub org: String,
    /// REST base URL. GraphQL lives at `{api_url}/graphql`.
    pub api_url: String,
    /// Freshness window for the project-board aggregate.
    pub cache_ttl: Duration,
    /// Period of the background quota probe.
    pub rate_poll_interval: Duration,
    /// Upper bound on any single upstream call.
    pub request_timeout: Duration,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `BOARDWATCH_ORG` - organization login (required)
    /// - `GITHUB_API_URL` - REST base URL (default: https://api.github.com)
    /// - `BOARDWATCH_CACHE_TTL_SECS` - project cache TTL (default: 300)
    /// - `BOARDWATCH_RATE_POLL_SECS` - quota probe period (default: 60)
    /// - `BOARDWATCH_REQUEST_TIMEOUT_SECS` - per-call timeout (default: 30)
    /// - `BOARDWATCH_LOG` - tracing filter (default: boardwatch=info)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let org = lookup("BOARDWATCH_ORG")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BoardError::Config("BOARDWATCH_ORG is not set".to_string()))?;

        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Ok(Self {
            org,
            api_url: lookup("GITHUB_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cache_ttl: secs("BOARDWATCH_CACHE_TTL_SECS", DEFAULT_CACHE_TTL),
            rate_poll_interval: secs("BOARDWATCH_RATE_POLL_SECS", DEFAULT_RATE_POLL),
            request_timeout: secs("BOARDWATCH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT),
            log_filter: lookup("BOARDWATCH_LOG").unwrap_or_else(|| "boardwatch=info".to_string()),
        })
    }
}

/// Resolve the API token: `GITHUB_TOKEN` first, then the stored token file.
pub fn resolve_token() -> Result<String> {
    resolve_token_from(|key| env::var(key).ok(), paths::token_path().as_deref())
}

pub fn resolve_token_from<F>(lookup: F, token_file: Option<&Path>) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("GITHUB_TOKEN")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        return Ok(token);
    }

    let Some(path) = token_file else {
        return Err(BoardError::MissingToken);
    };
    if !path.exists() {
        return Err(BoardError::MissingToken);
    }

    let token = fs::read_to_string(path)?.trim().to_string();
    if token.is_empty() {
        return Err(BoardError::MissingToken);
    }
    Ok(token)
}
