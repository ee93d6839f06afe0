use serde::{Deserialize, Serialize};

use super::board::TimeFilter;

/// Configuration from .taskboard/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub new_task: NewTaskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSection {
    /// Substring a document tag must contain (case-insensitively) for the
    /// document to count as a task
    #[serde(default = "default_task_tag")]
    pub task_tag: String,
    /// Filter used when no view state has been saved yet
    #[serde(default)]
    pub default_filter: TimeFilter,
}

impl Default for BoardSection {
    fn default() -> Self {
        BoardSection {
            task_tag: default_task_tag(),
            default_filter: TimeFilter::All,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSection {
    /// Directory names that are never scanned. Hidden directories are
    /// always skipped.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for VaultSection {
    fn default() -> Self {
        VaultSection {
            ignore: default_ignore(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskConfig {
    /// Vault-relative folder for new task documents ("" = vault root)
    #[serde(default)]
    pub folder: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl Default for NewTaskConfig {
    fn default() -> Self {
        NewTaskConfig {
            folder: String::new(),
            priority: default_priority(),
        }
    }
}

fn default_task_tag() -> String {
    "task".to_string()
}

fn default_ignore() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_priority() -> String {
    "low".to_string()
}
