use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config_io::board_dir;
use super::vault_io::atomic_write;
use crate::model::board::TimeFilter;

/// Persisted view state (written to .taskboard/state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewState {
    /// Active time filter
    #[serde(default)]
    pub filter: TimeFilter,
}

/// Read .taskboard/state.json from the vault
pub fn read_view_state(vault_root: &Path) -> Option<ViewState> {
    let path = board_dir(vault_root).join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed view state");
            None
        }
    }
}

/// Write .taskboard/state.json to the vault
pub fn write_view_state(vault_root: &Path, state: &ViewState) -> Result<(), std::io::Error> {
    let dir = board_dir(vault_root);
    fs::create_dir_all(&dir)?;
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&dir.join("state.json"), content.as_bytes())
}
