// Dashboard view state.
// Tracks the current load, the loaded dataset, and per-tab list selection.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use crate::error::{BoardError, Result};
use crate::model::Dashboard;

/// Loading state for async data.
#[derive(Debug, Clone)]
pub enum LoadingState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// Upstream quota is exhausted until `reset_at`.
    RateLimited {
        reset_at: DateTime<Utc>,
    },
    Error(String),
}

impl<T> Default for LoadingState<T> {
    fn default() -> Self {
        LoadingState::Idle
    }
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Keyboard selection over a list whose items live elsewhere.
#[derive(Debug, Clone, Default)]
pub struct SelectableList {
    pub list_state: ListState,
    len: usize,
}

impl SelectableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Replace the item count, keeping the selection in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        let selected = match (len, self.list_state.selected()) {
            (0, _) => None,
            (_, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn select_next(&mut self) {
        if self.len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.len => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.len == 0 {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        self.list_state.select((self.len > 0).then_some(0));
    }

    pub fn select_last(&mut self) {
        self.list_state.select(self.len.checked_sub(1));
    }
}

/// Everything the views render.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub data: LoadingState<Dashboard>,
    /// A reload is running while the previous dataset stays on screen.
    pub refreshing: bool,
    pub projects: SelectableList,
    pub issues: SelectableList,
    pub timeline: SelectableList,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.data.data()
    }

    /// Mark a load as started. Loaded data stays visible until the result arrives.
    pub fn begin_load(&mut self) {
        if self.data.is_loaded() {
            self.refreshing = true;
        } else {
            self.data = LoadingState::Loading;
        }
    }

    /// Fold a finished load into the view.
    pub fn apply(&mut self, result: Result<Dashboard>) {
        // A superseded load; the one that replaced it reports instead.
        if matches!(result, Err(BoardError::Cancelled)) {
            return;
        }

        self.refreshing = false;
        match result {
            Ok(dashboard) => {
                self.projects.set_len(dashboard.projects.len());
                self.issues.set_len(dashboard.issues.len());
                self.timeline.set_len(dashboard.timeline.len());
                self.data = LoadingState::Loaded(dashboard);
            }
            Err(BoardError::RateLimited { reset_at }) => {
                self.data = LoadingState::RateLimited { reset_at };
            }
            Err(e) => self.data = LoadingState::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::RateLimitState;

    fn dashboard(issues: usize) -> Dashboard {
        let now = Utc::now();
        let issue = crate::fetch::normalize::cross_reference(
            "x",
            crate::fetch::fake::issue(1, crate::github::IssueState::Open),
            &[],
        );
        Dashboard {
            organization: "acme".to_string(),
            members: Vec::new(),
            repositories: Vec::new(),
            projects: Vec::new(),
            issues: vec![issue; issues],
            pull_requests: Vec::new(),
            commits: Vec::new(),
            timeline: Vec::new(),
            rate_limit: RateLimitState {
                limit: 5000,
                remaining: 4000,
                used: 1000,
                reset_at: now,
            },
            projects_from_cache: false,
            failures: Vec::new(),
            generated_at: now,
        }
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut list = SelectableList::new();
        list.select_next();
        assert_eq!(list.selected(), None);

        list.set_len(3);
        assert_eq!(list.selected(), Some(0));
        list.select_prev();
        assert_eq!(list.selected(), Some(0));
        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), Some(2));

        list.set_len(2);
        assert_eq!(list.selected(), Some(1));
        list.set_len(0);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_begin_load_keeps_loaded_data() {
        let mut state = DashboardState::new();
        state.begin_load();
        assert!(state.data.is_loading());

        state.apply(Ok(dashboard(2)));
        assert_eq!(state.issues.len(), 2);
        state.begin_load();
        assert!(state.refreshing);
        assert!(state.dashboard().is_some());
    }

    #[test]
    fn test_apply_rate_limited_shows_reset() {
        let mut state = DashboardState::new();
        state.apply(Ok(dashboard(1)));
        let reset_at = Utc::now();

        state.apply(Err(BoardError::RateLimited { reset_at }));

        assert!(matches!(state.data, LoadingState::RateLimited { reset_at: r } if r == reset_at));
        assert!(!state.refreshing);
    }

    #[test]
    fn test_apply_ignores_cancelled_load() {
        let mut state = DashboardState::new();
        state.apply(Ok(dashboard(1)));
        state.begin_load();

        state.apply(Err(BoardError::Cancelled));

        assert!(state.data.is_loaded());
        assert!(state.refreshing);
    }

    #[test]
    fn test_apply_error_message() {
        let mut state = DashboardState::new();
        state.apply(Err(BoardError::Unauthorized));
        assert!(matches!(state.data, LoadingState::Error(_)));
    }
}
