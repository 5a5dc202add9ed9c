// GitHub API HTTP client.
// Handles authentication, quota header tracking, and REST/GraphQL request processing.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::{BoardError, Result};

use super::types::{GraphQlError, GraphQlResponse, HeaderQuota};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with authentication and quota tracking.
pub struct GitHubClient {
    client: Client,
    api_url: String,
    graphql_url: String,
    quota: Mutex<HeaderQuota>,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: &str, api_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| BoardError::Other(e.to_string()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("boardwatch"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(BoardError::Api)?;

        let api_url = api_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            graphql_url: format!("{}/graphql", api_url),
            api_url,
            quota: Mutex::new(HeaderQuota::default()),
        })
    }

    /// Create a client from loaded configuration and a resolved token.
    pub fn from_config(config: &Config, token: &str) -> Result<Self> {
        Self::new(token, &config.api_url, config.request_timeout)
    }

    /// Last quota observed in response headers.
    pub fn header_quota(&self) -> HeaderQuota {
        self.quota
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(BoardError::Api)?;

        let quota = quota_from_headers(response.headers());
        self.update_quota(&quota);
        self.check_response(response, &quota).await
    }

    /// Run a GraphQL query and unwrap its `data` member.
    pub async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self
            .client
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(BoardError::Api)?;

        let quota = quota_from_headers(response.headers());
        self.update_quota(&quota);
        let response = self.check_response(response, &quota).await?;
        let envelope: GraphQlResponse<T> = response.json().await?;

        if let Some(error) = graphql_error(&envelope.errors, &quota) {
            return Err(error);
        }
        envelope
            .data
            .ok_or_else(|| BoardError::GraphQl("response carried no data".to_string()))
    }

    /// Merge quota seen on one response into the shared snapshot.
    fn update_quota(&self, seen: &HeaderQuota) {
        let mut quota = self.quota.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.limit.is_some() {
            quota.limit = seen.limit;
        }
        if seen.remaining.is_some() {
            quota.remaining = seen.remaining;
        }
        if seen.reset.is_some() {
            quota.reset = seen.reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response, quota: &HeaderQuota) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(classify(status, quota, &url, &body))
    }
}

/// Quota carried by a single response's headers.
fn quota_from_headers(headers: &HeaderMap) -> HeaderQuota {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    HeaderQuota {
        limit: header("x-ratelimit-limit").and_then(|v| v.parse().ok()),
        remaining: header("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
        reset: header("x-ratelimit-reset").and_then(|v| v.parse().ok()),
    }
}

/// Map a non-success status to an error. 403 and 429 count as rate limiting only
/// when the same response reports zero remaining.
fn classify(status: StatusCode, quota: &HeaderQuota, url: &str, body: &str) -> BoardError {
    match status {
        StatusCode::UNAUTHORIZED => BoardError::Unauthorized,
        StatusCode::NOT_FOUND => BoardError::NotFound(url.to_string()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if quota.remaining == Some(0) => {
            BoardError::RateLimited {
                reset_at: reset_instant(quota),
            }
        }
        StatusCode::FORBIDDEN => BoardError::Other(format!("Forbidden: {}", body)),
        status => BoardError::Other(format!("HTTP {}: {}", status, body)),
    }
}

/// GraphQL reports quota exhaustion in-band with a `RATE_LIMITED` error type.
fn graphql_error(errors: &[GraphQlError], quota: &HeaderQuota) -> Option<BoardError> {
    if errors.iter().any(|e| e.kind.as_deref() == Some("RATE_LIMITED")) {
        return Some(BoardError::RateLimited {
            reset_at: reset_instant(quota),
        });
    }
    errors
        .first()
        .map(|first| BoardError::GraphQl(first.message.clone()))
}

/// Reset instant from header quota, or one hour out when the header was missing.
fn reset_instant(quota: &HeaderQuota) -> DateTime<Utc> {
    quota
        .reset
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1))
}
