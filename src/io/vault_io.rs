use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};

use super::store::{ChangeFeed, DocumentInfo, DocumentStore, StoreError};
use super::watcher::VaultWatcher;

/// A directory of markdown notes, used as the document store.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    ignore: Vec<String>,
}

impl VaultStore {
    pub fn new(root: impl Into<PathBuf>, ignore: Vec<String>) -> Self {
        VaultStore {
            root: root.into(),
            ignore,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault-relative document path onto the filesystem. Absolute
    /// paths and `..` components are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(path);
        let clean = !path.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !clean {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(rel))
    }

    fn info_for(&self, full: &Path) -> Option<DocumentInfo> {
        let rel = full.strip_prefix(&self.root).ok()?;
        let meta = fs::metadata(full).ok()?;
        if !meta.is_file() {
            return None;
        }
        let created = meta.created().or_else(|_| meta.modified()).ok();
        Some(DocumentInfo {
            path: doc_path(rel),
            basename: full.file_stem()?.to_string_lossy().into_owned(),
            created_at: created.map(millis_since_epoch).unwrap_or(0),
        })
    }
}

impl DocumentStore for VaultStore {
    fn list(&self) -> Result<Vec<DocumentInfo>, StoreError> {
        let mut docs = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e, &self.ignore));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            match self.info_for(entry.path()) {
                Some(info) => docs.push(info),
                None => tracing::warn!(path = %entry.path().display(), "skipping unreadable document"),
            }
        }
        Ok(docs)
    }

    fn lookup(&self, path: &str) -> Option<DocumentInfo> {
        let full = self.resolve(path).ok()?;
        if !is_markdown(&full) {
            return None;
        }
        self.info_for(&full)
    }

    fn read(&self, path: &str) -> Result<String, StoreError> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            _ => StoreError::ReadError {
                path: full.clone(),
                source: e,
            },
        })
    }

    fn write(&self, path: &str, text: &str) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        // Overwrite in place: replacing the file would reset its creation time,
        // which the board uses as the order tie-break. A failure after the
        // truncate leaves the file short.
        let result = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&full)
            .and_then(|mut f| f.write_all(text.as_bytes()));
        result.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            _ => StoreError::WriteError {
                path: full.clone(),
                source: e,
            },
        })
    }

    fn create(&self, path: &str, text: &str) -> Result<DocumentInfo, StoreError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        create_new(&full, text.as_bytes()).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
            _ => StoreError::WriteError {
                path: full.clone(),
                source: e,
            },
        })?;
        self.info_for(&full)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn watch(&self) -> Result<Box<dyn ChangeFeed>, StoreError> {
        let watcher = VaultWatcher::start(&self.root, self.ignore.clone())?;
        Ok(Box::new(watcher))
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Like `atomic_write`, but fails with `AlreadyExists` instead of replacing.
fn create_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}

/// Hidden directories (`.obsidian`, `.taskboard`, ...) and configured names
/// are never descended into.
pub fn is_skipped_name(name: &str, ignore: &[String]) -> bool {
    name.starts_with('.') || ignore.iter().any(|i| i == name)
}

fn is_skipped_dir(entry: &DirEntry, ignore: &[String]) -> bool {
    entry.file_type().is_dir() && is_skipped_name(&entry.file_name().to_string_lossy(), ignore)
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Vault-relative path in store form (`/`-separated)
pub fn doc_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn millis_since_epoch(t: SystemTime) -> i64 {
    DateTime::<Utc>::from(t).timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_vault(dir: &Path) {
        fs::create_dir_all(dir.join("Projects/Site")).unwrap();
        fs::create_dir_all(dir.join(".obsidian")).unwrap();
        fs::create_dir_all(dir.join("node_modules/pkg")).unwrap();
        fs::write(dir.join("Inbox.md"), "# Inbox\n").unwrap();
        fs::write(
            dir.join("Projects/Site/Launch.md"),
            "---\ntags: [task]\nstatus: doing\n---\nShip it\n",
        )
        .unwrap();
        fs::write(dir.join("Projects/Site/logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(dir.join(".obsidian/workspace.md"), "hidden").unwrap();
        fs::write(dir.join("node_modules/pkg/README.md"), "vendored").unwrap();
    }

    fn store(dir: &Path) -> VaultStore {
        VaultStore::new(dir, vec!["node_modules".to_string()])
    }

    #[test]
    fn test_list_markdown_only() {
        let tmp = TempDir::new().unwrap();
        create_test_vault(tmp.path());

        let docs = store(tmp.path()).list().unwrap();
        let paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["Inbox.md", "Projects/Site/Launch.md"]);
        assert_eq!(docs[1].basename, "Launch");
        assert!(docs[1].created_at > 0);
    }

    #[test]
    fn test_lookup() {
        let tmp = TempDir::new().unwrap();
        create_test_vault(tmp.path());
        let store = store(tmp.path());

        let info = store.lookup("Projects/Site/Launch.md").unwrap();
        assert_eq!(info.basename, "Launch");
        assert!(store.lookup("Projects/Site/Missing.md").is_none());
        assert!(store.lookup("Projects/Site/logo.png").is_none());
        assert!(store.lookup("../outside.md").is_none());
    }

    #[test]
    fn test_read_and_write_in_place() {
        let tmp = TempDir::new().unwrap();
        create_test_vault(tmp.path());
        let store = store(tmp.path());

        store.write("Inbox.md", "# Inbox\n\n- item\n").unwrap();
        assert_eq!(store.read("Inbox.md").unwrap(), "# Inbox\n\n- item\n");
        assert!(store.lookup("Inbox.md").is_some());
    }

    #[test]
    fn test_write_missing_document() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        assert!(matches!(
            store.write("Gone.md", "x"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.read("Gone.md"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_create_new_and_refuse_overwrite() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());

        let info = store.create("Tasks/New.md", "---\ntags: [task]\n---\n").unwrap();
        assert_eq!(info.path, "Tasks/New.md");
        assert_eq!(info.basename, "New");
        assert!(matches!(
            store.create("Tasks/New.md", "other"),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.read("Tasks/New.md").unwrap(), "---\ntags: [task]\n---\n");
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_invalid_paths_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        assert!(matches!(store.read(""), Err(StoreError::InvalidPath(_))));
        assert!(matches!(
            store.read("/etc/passwd"),
            Err(StoreError::InvalidPath(_))
        ));
    }
}
