use serde::Serialize;

use crate::model::board::{BoardState, TimeFilter};
use crate::model::task::{Status, Task};
use crate::sync::{MoveOutcome, SkipReason};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub filter: TimeFilter,
    pub label: &'static str,
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub status: Status,
    pub title: &'static str,
    pub tasks: &'a [Task],
}

#[derive(Serialize)]
pub struct MoveJson<'a> {
    pub path: &'a str,
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<&'static str>,
}

#[derive(Serialize)]
pub struct FilterJson {
    pub filter: TimeFilter,
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn board_to_json(board: &BoardState, filter: TimeFilter) -> BoardJson<'_> {
    BoardJson {
        filter,
        label: filter.label(),
        columns: board
            .columns()
            .map(|(status, tasks)| ColumnJson {
                status,
                title: status.title(),
                tasks,
            })
            .collect(),
    }
}

pub fn move_to_json<'a>(path: &'a str, outcome: &MoveOutcome) -> MoveJson<'a> {
    match outcome {
        MoveOutcome::Moved { status, order } => MoveJson {
            path,
            moved: true,
            status: Some(*status),
            order: Some(*order),
            skipped: None,
        },
        MoveOutcome::Skipped(reason) => MoveJson {
            path,
            moved: false,
            status: None,
            order: None,
            skipped: Some(skip_reason_str(*reason)),
        },
    }
}

fn skip_reason_str(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotFound => "not found",
        SkipReason::Unreadable => "unreadable",
        SkipReason::NoMetadata => "no frontmatter",
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One card: title, path, then whatever optional fields are set
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!("  {}  <{}>", task.title, task.path);
    let f = &task.fields;
    let extras = [
        ("priority", &f.priority),
        ("due", &f.due_date),
        ("project", &f.project),
        ("est", &f.estimate_hours),
    ];
    for (label, value) in extras {
        if let Some(v) = value {
            line.push_str(&format!(" {}:{}", label, v));
        }
    }
    line
}

pub fn format_column(status: Status, tasks: &[Task]) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", status.title(), tasks.len())];
    lines.extend(tasks.iter().map(format_task_line));
    lines
}

/// The whole board, columns in board order, separated by blank lines
pub fn format_board(board: &BoardState, filter: TimeFilter) -> String {
    let mut blocks = vec![format!("[{}]", filter.label())];
    for (status, tasks) in board.columns() {
        blocks.push(format_column(status, tasks).join("\n"));
    }
    blocks.join("\n\n")
}

pub fn format_move(path: &str, outcome: &MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Moved { status, order } => {
            format!("{} -> {} (order {})", path, status.title(), order)
        }
        MoveOutcome::Skipped(reason) => {
            format!("{}: nothing moved ({})", path, skip_reason_str(*reason))
        }
    }
}

/// Parse a status string into Status
pub fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse_status(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: backlog, todo, doing, done)",
            s
        )
    })
}
