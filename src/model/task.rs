use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use super::frontmatter::{Frontmatter, scalar_text};

/// Board column a task is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Backlog,
    Todo,
    Doing,
    Done,
}

impl Status {
    /// All columns, in board order
    pub const ALL: [Status; 4] = [Status::Backlog, Status::Todo, Status::Doing, Status::Done];

    /// The value written to a document's `status:` field
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::Todo => "todo",
            Status::Doing => "doing",
            Status::Done => "done",
        }
    }

    /// Column heading shown on the board
    pub fn title(self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Todo => "To Do",
            Status::Doing => "In Progress",
            Status::Done => "Done",
        }
    }

    /// Strict parse of a status key (case-insensitive). Used for user input.
    pub fn parse_status(s: &str) -> Option<Status> {
        match s.trim().to_lowercase().as_str() {
            "backlog" => Some(Status::Backlog),
            "todo" => Some(Status::Todo),
            "doing" => Some(Status::Doing),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    /// Lenient mapping of a raw metadata value onto a column.
    /// Anything unrecognized, including an empty value, files under To Do.
    pub fn normalize(raw: &str) -> Status {
        Status::parse_status(raw).unwrap_or(Status::Todo)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata carried from a document header to the board.
///
/// Only `tags` and the date fields are interpreted by the engine; everything
/// else is passed through as text. Keys the engine doesn't know about are
/// kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskFields {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_hours: Option<String>,
    /// `due_date:`, falling back to the template's `due:`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

/// Header keys with a dedicated home on `Task` or `TaskFields`
const KNOWN_KEYS: &[&str] = &[
    "tags",
    "status",
    "order",
    "priority",
    "project",
    "estimate_hours",
    "due_date",
    "due",
    "started_at",
    "completed_at",
    "author",
];

impl TaskFields {
    pub fn from_frontmatter(fm: &Frontmatter) -> Self {
        let extra = fm
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(key))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        TaskFields {
            tags: fm.tags(),
            priority: fm.get_text("priority"),
            project: fm.get_text("project"),
            estimate_hours: fm.get_text("estimate_hours"),
            due_date: fm.get_text("due_date").or_else(|| fm.get_text("due")),
            started_at: fm.get_text("started_at"),
            completed_at: fm.get_text("completed_at"),
            author: fm.get_text("author"),
            extra,
        }
    }
}

/// A task card: one document, projected onto the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Store identifier of the backing document
    pub path: String,
    /// Document base name (not stored in metadata)
    pub title: String,
    pub status: Status,
    /// Position key within the column (ascending)
    pub order: f64,
    /// Creation time of the document, milliseconds since the Unix epoch
    pub created_at: i64,
    #[serde(flatten)]
    pub fields: TaskFields,
}

impl Task {
    /// Project a decoded header onto a task record.
    pub fn from_frontmatter(path: &str, title: &str, created_at: i64, fm: &Frontmatter) -> Self {
        let status = fm
            .get("status")
            .and_then(scalar_text)
            .map(|s| Status::normalize(&s))
            .unwrap_or(Status::Todo);

        Task {
            path: path.to_string(),
            title: title.to_string(),
            status,
            order: fm.order(),
            created_at,
            fields: TaskFields::from_frontmatter(fm),
        }
    }
}
