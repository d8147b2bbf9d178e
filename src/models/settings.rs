use super::project::Breakpoint;
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in [`StudioSettings::recent_projects`].
pub const MAX_RECENT_PROJECTS: usize = 10;

/// Editor settings from `Studio Settings.yaml`.
///
/// Every field has a default so a partial or missing file still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioSettings {
    /// Breakpoint the editor starts in.
    pub default_breakpoint: Breakpoint,

    pub debug_mode: bool,

    pub log_dir: String,

    /// Directory offered first when saving or opening project files.
    pub projects_dir: String,

    /// Description given to projects created without one.
    pub default_project_description: String,

    /// Most recently opened project files, newest first.
    pub recent_projects: Vec<String>,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            default_breakpoint: Breakpoint::Desktop,
            debug_mode: false,
            log_dir: "logs".to_string(),
            projects_dir: "projects".to_string(),
            default_project_description: String::new(),
            recent_projects: Vec::new(),
        }
    }
}

impl StudioSettings {
    /// Move `path` to the front of the recent list, dropping the oldest
    /// entries beyond [`MAX_RECENT_PROJECTS`].
    pub fn record_recent_project(&mut self, path: &str) {
        self.recent_projects.retain(|p| p != path);
        self.recent_projects.insert(0, path.to_string());
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }
}
