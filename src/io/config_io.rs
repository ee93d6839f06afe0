use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::BoardConfig;

/// Directory holding taskboard's own files inside a vault
pub const BOARD_DIR: &str = ".taskboard";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn board_dir(vault_root: &Path) -> PathBuf {
    vault_root.join(BOARD_DIR)
}

pub fn config_path(vault_root: &Path) -> PathBuf {
    board_dir(vault_root).join("config.toml")
}

/// Read `.taskboard/config.toml`. A missing file yields the defaults.
pub fn load_config(vault_root: &Path) -> Result<BoardConfig, ConfigError> {
    let path = config_path(vault_root);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(BoardConfig::default());
        }
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::ParseError { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::TimeFilter;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.board.task_tag, "task");
    }

    #[test]
    fn test_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(board_dir(tmp.path())).unwrap();
        fs::write(
            config_path(tmp.path()),
            r#"
[board]
task_tag = "todo"
default_filter = "today"

[vault]
ignore = ["Archive"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.board.task_tag, "todo");
        assert_eq!(config.board.default_filter, TimeFilter::Today);
        assert_eq!(config.vault.ignore, vec!["Archive"]);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(board_dir(tmp.path())).unwrap();
        fs::write(config_path(tmp.path()), "[board]\ndefault_filter = \"month\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
