use chrono::NaiveDateTime;
use serde_yaml_ng::Value;

use crate::model::frontmatter::Frontmatter;
use crate::model::task::Status;
use crate::parse::render_header;

const NEW_TASK_BODY: &str = "# New Task\n\nDescribe the task here.";

/// `Task YYYY-MM-DD HHMMSS.md`, stamped with local time
pub fn new_task_file_name(now: NaiveDateTime) -> String {
    format!("Task {}.md", now.format("%Y-%m-%d %H%M%S"))
}

/// Store path for a new task document inside `folder` (vault-relative,
/// empty for the vault root).
pub fn new_task_path(folder: &str, now: NaiveDateTime) -> String {
    let name = new_task_file_name(now);
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        name
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Header of a freshly created task. Fields the user is expected to fill in
/// are present but blank.
pub fn new_task_header(task_tag: &str, status: Status, priority: &str) -> Frontmatter {
    let mut fm = Frontmatter::new();
    fm.set("tags", Value::Sequence(vec![Value::String(task_tag.to_string())]));
    fm.set_str("status", status.as_str());
    fm.set("assignee", Value::Null);
    fm.set_str("priority", priority);
    for key in ["estimate_hours", "due", "started_at", "completed_at", "project"] {
        fm.set(key, Value::Null);
    }
    fm
}

/// Full text of a new task document
pub fn new_task_document(task_tag: &str, status: Status, priority: &str) -> String {
    let header = render_header(&new_task_header(task_tag, status, priority));
    format!("{}\n\n{}", header, NEW_TASK_BODY)
}
