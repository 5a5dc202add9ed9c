// State management module.
// Holds the loaded dashboard and per-tab selection.

pub mod dashboard;

pub use dashboard::{DashboardState, LoadingState, SelectableList};
