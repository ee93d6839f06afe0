use crate::io::store::{DocumentInfo, DocumentStore, StoreError};
use crate::model::frontmatter::Frontmatter;
use crate::model::task::{Status, Task};
use crate::parse::parse_frontmatter;

/// True when any tag contains `task_tag`, ignoring case.
pub fn is_task(fm: &Frontmatter, task_tag: &str) -> bool {
    let needle = task_tag.to_lowercase();
    fm.tags().iter().any(|t| t.to_lowercase().contains(&needle))
}

/// Project a decoded header onto a task, or `None` if it isn't tagged as one.
pub fn project_task(info: &DocumentInfo, fm: &Frontmatter, task_tag: &str) -> Option<Task> {
    if !is_task(fm, task_tag) {
        return None;
    }
    Some(Task::from_frontmatter(
        &info.path,
        &info.basename,
        info.created_at,
        fm,
    ))
}

/// Classify one document's text. Documents without a usable header or
/// without the task tag yield `None`.
pub fn classify_document(info: &DocumentInfo, text: &str, task_tag: &str) -> Option<Task> {
    let fm = parse_frontmatter(text)?;
    project_task(info, &fm, task_tag)
}

/// Read every document in the store and keep the tasks, unsorted.
///
/// A document that can't be read is skipped; only a failure to enumerate
/// the store is an error.
pub fn load_tasks(store: &dyn DocumentStore, task_tag: &str) -> Result<Vec<Task>, StoreError> {
    let docs = store.list()?;
    let mut tasks = Vec::new();
    for info in &docs {
        let text = match store.read(&info.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %info.path, error = %e, "skipping unreadable document");
                continue;
            }
        };
        match classify_document(info, &text, task_tag) {
            Some(task) => tasks.push(task),
            None => tracing::trace!(path = %info.path, "not a task"),
        }
    }
    tracing::debug!(documents = docs.len(), tasks = tasks.len(), "classified vault");
    Ok(tasks)
}

/// The tasks currently persisted in one column, unsorted.
pub fn load_column(
    store: &dyn DocumentStore,
    task_tag: &str,
    status: Status,
) -> Result<Vec<Task>, StoreError> {
    let mut tasks = load_tasks(store, task_tag)?;
    tasks.retain(|t| t.status == status);
    Ok(tasks)
}
