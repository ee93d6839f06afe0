use std::path::PathBuf;

use serde::Serialize;

/// A document as listed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// Store identifier (vault-relative path with `/` separators)
    pub path: String,
    /// File name without extension; shown as the card title
    pub basename: String,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: i64,
}

/// Change notifications delivered through a `ChangeFeed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created(String),
    Modified(String),
    Removed(String),
}

impl StoreEvent {
    pub fn path(&self) -> &str {
        match self {
            StoreEvent::Created(p) | StoreEvent::Modified(p) | StoreEvent::Removed(p) => p,
        }
    }
}

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("document already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid document path: {0}")]
    InvalidPath(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not scan vault: {0}")]
    WalkError(#[from] walkdir::Error),
    #[error("could not watch vault: {0}")]
    WatchError(#[from] notify::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Subscription to store changes. Dropping it ends the subscription.
pub trait ChangeFeed {
    /// Non-blocking: drain every queued event (may be empty).
    fn poll(&self) -> Vec<StoreEvent>;
}

/// The document collection the board is built from.
pub trait DocumentStore {
    /// Every candidate document.
    fn list(&self) -> Result<Vec<DocumentInfo>, StoreError>;

    /// Look a document up by path; `None` when it doesn't exist (any more).
    fn lookup(&self, path: &str) -> Option<DocumentInfo>;

    fn read(&self, path: &str) -> Result<String, StoreError>;

    /// Overwrite an existing document.
    fn write(&self, path: &str, text: &str) -> Result<(), StoreError>;

    /// Create a new document; fails if `path` is taken.
    fn create(&self, path: &str, text: &str) -> Result<DocumentInfo, StoreError>;

    /// Start a change subscription.
    fn watch(&self) -> Result<Box<dyn ChangeFeed>, StoreError>;
}
