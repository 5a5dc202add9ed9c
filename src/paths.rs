// Platform directory helpers.
// Locates the stored token file and the log file.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "boardwatch")
}

/// Base config directory (~/.config/boardwatch on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Base cache directory (~/.cache/boardwatch on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a locally stored API token.
pub fn token_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("token"))
}

/// Path to the tracing log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("boardwatch.log"))
}
