// Dashboard load orchestration.
// Gates on quota, serves project boards through the cache, and fans out per-repository
// listings with failure isolation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::collect::{Collected, failure, is_quota_related};
use super::context::{DashboardContext, PROJECTS_KEY};
use super::normalize::{commit_record, cross_reference, normalize_project, pull_record};
use super::timeline::{RepoComments, build_timeline};
use crate::cache::CacheInfo;
use crate::cancel::CancelToken;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::github::endpoints::MAX_PAGES;
use crate::github::{DashboardSource, RateLimitState};
use crate::model::{CommitRecord, Dashboard, Project, Resource, SubresourceFailure};

pub struct FetchOrchestrator<S> {
    source: Arc<S>,
    ctx: Arc<DashboardContext>,
    org: String,
    request_timeout: Duration,
}

impl<S: DashboardSource> FetchOrchestrator<S> {
    pub fn new(
        source: Arc<S>,
        ctx: Arc<DashboardContext>,
        org: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            source,
            ctx,
            org: org.into(),
            request_timeout,
        }
    }

    pub fn from_config(source: Arc<S>, config: &Config) -> Self {
        let ctx = Arc::new(DashboardContext::new(config));
        Self::new(source, ctx, config.org.clone(), config.request_timeout)
    }

    pub fn context(&self) -> &Arc<DashboardContext> {
        &self.ctx
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn organization(&self) -> &str {
        &self.org
    }

    /// Project boards, served from the cache while fresh.
    ///
    /// A cache hit touches neither the quota nor the network. On a miss the quota
    /// gate runs first, then the paginated query; only a successful query is cached.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        if let Some(projects) = self.ctx.cache.get(PROJECTS_KEY) {
            debug!(count = projects.len(), "projects served from cache");
            return Ok(projects);
        }

        self.ctx.guard.ensure_available(&*self.source).await?;
        let (projects, _) = self.refresh_projects().await?;
        Ok(projects)
    }

    /// Drop the cached project boards so the next load re-queries them.
    pub fn force_refresh(&self) {
        info!("project cache cleared");
        self.ctx.cache.clear();
    }

    pub fn projects_cache_info(&self) -> Option<CacheInfo> {
        self.ctx.cache.cache_info(PROJECTS_KEY)
    }

    /// Last known quota.
    pub fn rate_limit(&self) -> Option<RateLimitState> {
        self.ctx.guard.current()
    }

    /// Load everything the dashboard shows.
    ///
    /// Fails only when the quota is exhausted or `cancel` fires. Every other
    /// upstream failure is absorbed and listed in `Dashboard::failures`.
    pub async fn load_dashboard(&self, cancel: &CancelToken) -> Result<Dashboard> {
        if cancel.is_cancelled() {
            return Err(BoardError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("dashboard load cancelled");
                Err(BoardError::Cancelled)
            }
            result = self.load_inner() => result,
        }
    }

    async fn load_inner(&self) -> Result<Dashboard> {
        let source = &*self.source;
        let org = self.org.as_str();
        let limit = self.request_timeout;

        let mut rate_limit = self.ctx.guard.ensure_available(source).await?;
        let mut failures: Vec<SubresourceFailure> = Vec::new();

        let (projects, projects_from_cache) = match self.ctx.cache.get(PROJECTS_KEY) {
            Some(projects) => (projects, true),
            None => {
                let (projects, failed) = self.refresh_projects().await?;
                failures.extend(failed);
                (projects, false)
            }
        };

        let (members, repositories) = tokio::join!(
            with_timeout(limit, source.members(org)),
            with_timeout(limit, source.repositories(org)),
        );
        let members = members.unwrap_or_else(|e| {
            failures.push(failure(org, Resource::Members, &e));
            Vec::new()
        });
        let repositories = repositories.unwrap_or_else(|e| {
            failures.push(failure(org, Resource::Repositories, &e));
            Vec::new()
        });
        let names: Vec<String> = repositories.iter().map(|r| r.name.clone()).collect();

        let (issues, pulls, commits, issue_comments, review_comments) = tokio::join!(
            self.fan_out(&names, Resource::Issues, move |repo| async move {
                source.issues(org, &repo).await
            }),
            self.fan_out(&names, Resource::Pulls, move |repo| async move {
                source.pulls(org, &repo).await
            }),
            self.fan_out(&names, Resource::Commits, move |repo| async move {
                source.commits(org, &repo).await
            }),
            self.fan_out(&names, Resource::IssueComments, move |repo| async move {
                source.issue_comments(org, &repo).await
            }),
            self.fan_out(&names, Resource::ReviewComments, move |repo| async move {
                source.review_comments(org, &repo).await
            }),
        );

        let quota_hit = failures.iter().any(|f| f.quota_related)
            || issues.any_quota_related()
            || pulls.any_quota_related()
            || commits.any_quota_related()
            || issue_comments.any_quota_related()
            || review_comments.any_quota_related();

        let fetched = issues.item_count()
            + pulls.item_count()
            + commits.item_count()
            + issue_comments.item_count()
            + review_comments.item_count();

        let placeholders: Vec<CommitRecord> = commits
            .failed_repositories()
            .map(CommitRecord::placeholder)
            .collect();

        failures.extend(issues.failed);
        failures.extend(pulls.failed);
        failures.extend(commits.failed);
        failures.extend(issue_comments.failed);
        failures.extend(review_comments.failed);

        let mut dashboard_issues = Vec::new();
        for batch in issues.succeeded {
            for issue in batch.items {
                dashboard_issues.push(cross_reference(&batch.repository, issue, &projects));
            }
        }

        let mut pull_requests = Vec::new();
        for batch in pulls.succeeded {
            for pull in batch.items {
                pull_requests.push(pull_record(&batch.repository, pull));
            }
        }

        let mut commit_records = Vec::new();
        for batch in commits.succeeded {
            for commit in batch.items {
                commit_records.push(commit_record(&batch.repository, commit));
            }
        }
        commit_records.extend(placeholders);

        let issue_groups: Vec<_> = issue_comments
            .succeeded
            .iter()
            .map(|b| RepoComments {
                repository: &b.repository,
                comments: &b.items,
            })
            .collect();
        let review_groups: Vec<_> = review_comments
            .succeeded
            .iter()
            .map(|b| RepoComments {
                repository: &b.repository,
                comments: &b.items,
            })
            .collect();
        let timeline = build_timeline(&commit_records, &issue_groups, &review_groups);

        if quota_hit {
            debug!("quota-related failure seen, re-probing");
            rate_limit = self.ctx.guard.probe(source).await;
        }

        info!(
            org,
            repositories = repositories.len(),
            projects = projects.len(),
            issues = dashboard_issues.len(),
            pulls = pull_requests.len(),
            events = timeline.len(),
            fetched,
            failures = failures.len(),
            projects_from_cache,
            "dashboard loaded"
        );

        Ok(Dashboard {
            organization: self.org.clone(),
            members,
            repositories,
            projects,
            issues: dashboard_issues,
            pull_requests,
            commits: commit_records,
            timeline,
            rate_limit,
            projects_from_cache,
            failures,
            generated_at: self.ctx.clock.now(),
        })
    }

    /// Query and cache the project boards. Only a quota error propagates; anything
    /// else degrades to an empty list that is not cached.
    async fn refresh_projects(&self) -> Result<(Vec<Project>, Option<SubresourceFailure>)> {
        match self.query_projects().await {
            Ok(projects) => {
                info!(count = projects.len(), "projects fetched");
                self.ctx.cache.set(PROJECTS_KEY, projects.clone());
                Ok((projects, None))
            }
            Err(e) if e.is_rate_limited() => {
                self.ctx.guard.probe(&*self.source).await;
                Err(e)
            }
            Err(e) if is_quota_related(&e) => {
                let state = self.ctx.guard.probe(&*self.source).await;
                warn!(error = %e, "project query hit the rate limit");
                Err(BoardError::RateLimited {
                    reset_at: state.reset_at,
                })
            }
            Err(e) => Ok((
                Vec::new(),
                Some(failure(&self.org, Resource::Projects, &e)),
            )),
        }
    }

    /// Walk every project page and every item page inside each project.
    async fn query_projects(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        let mut after: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = with_timeout(
                self.request_timeout,
                self.source.project_page(&self.org, after.as_deref()),
            )
            .await?;

            for mut node in page.nodes {
                let mut items = std::mem::take(&mut node.items.nodes);
                let mut page_info = node.items.page_info.clone();

                for _ in 0..MAX_PAGES {
                    if !page_info.has_next_page {
                        break;
                    }
                    let Some(cursor) = page_info.end_cursor.take() else {
                        break;
                    };
                    let next = with_timeout(
                        self.request_timeout,
                        self.source.project_items_page(&node.id, Some(&cursor)),
                    )
                    .await?;
                    items.extend(next.nodes);
                    page_info = next.page_info;
                }

                projects.push(normalize_project(node, items));
            }

            match page.page_info.end_cursor {
                Some(cursor) if page.page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }

        Ok(projects)
    }

    /// One call per repository, joined. Each call has its own timeout and its own
    /// failure slot.
    async fn fan_out<T, F, Fut>(&self, repos: &[String], resource: Resource, fetch: F) -> Collected<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let limit = self.request_timeout;
        let results = join_all(repos.iter().map(|repo| {
            let call = fetch(repo.clone());
            let repo = repo.clone();
            async move { (repo, with_timeout(limit, call).await) }
        }))
        .await;

        Collected::from_results(resource, results)
    }
}

async fn with_timeout<T>(limit: Duration, call: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BoardError::Timeout(limit)),
    }
}
