use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::task::{Status, Task};

/// Time window applied to the board before display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    /// Due today or overdue
    Today,
    /// Touched in the current Sunday-to-Saturday week
    Week,
}

impl TimeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::Today => "today",
            TimeFilter::Week => "week",
        }
    }

    /// Human-readable name for the filter selector
    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::All => "All Tasks",
            TimeFilter::Today => "Today",
            TimeFilter::Week => "This Week",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TimeFilter::All),
            "today" => Ok(TimeFilter::Today),
            "week" => Ok(TimeFilter::Week),
            other => Err(format!(
                "unknown filter '{}' (expected all, today or week)",
                other
            )),
        }
    }
}

impl std::fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four status columns and their cards.
///
/// Every column always exists, even when empty. Ordering inside a column is
/// the caller's business (see `ops::order`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    backlog: Vec<Task>,
    todo: Vec<Task>,
    doing: Vec<Task>,
    done: Vec<Task>,
}

impl BoardState {
    pub fn new() -> Self {
        BoardState::default()
    }

    /// Bucket tasks into columns by status, keeping input order.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = BoardState::new();
        for task in tasks {
            board.column_mut(task.status).push(task);
        }
        board
    }

    pub fn column(&self, status: Status) -> &[Task] {
        match status {
            Status::Backlog => &self.backlog,
            Status::Todo => &self.todo,
            Status::Doing => &self.doing,
            Status::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, status: Status) -> &mut Vec<Task> {
        match status {
            Status::Backlog => &mut self.backlog,
            Status::Todo => &mut self.todo,
            Status::Doing => &mut self.doing,
            Status::Done => &mut self.done,
        }
    }

    /// Columns in board order
    pub fn columns(&self) -> impl Iterator<Item = (Status, &[Task])> {
        Status::ALL.into_iter().map(|s| (s, self.column(s)))
    }

    /// Locate a task by document path: (column, index)
    pub fn find(&self, path: &str) -> Option<(Status, usize)> {
        self.columns().find_map(|(status, tasks)| {
            tasks
                .iter()
                .position(|t| t.path == path)
                .map(|idx| (status, idx))
        })
    }

    pub fn get(&self, path: &str) -> Option<&Task> {
        self.find(path).map(|(status, idx)| &self.column(status)[idx])
    }

    pub fn remove(&mut self, path: &str) -> Option<Task> {
        let (status, idx) = self.find(path)?;
        Some(self.column_mut(status).remove(idx))
    }

    /// Total number of cards on the board
    pub fn len(&self) -> usize {
        self.columns().map(|(_, tasks)| tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskFields;

    fn task(path: &str, status: Status) -> Task {
        Task {
            path: path.into(),
            title: path.trim_end_matches(".md").into(),
            status,
            order: 0.0,
            created_at: 0,
            fields: TaskFields::default(),
        }
    }

    #[test]
    fn empty_board_has_all_columns() {
        let board = BoardState::new();
        let columns: Vec<Status> = board.columns().map(|(s, _)| s).collect();
        assert_eq!(columns, Status::ALL.to_vec());
        assert!(board.is_empty());
    }

    #[test]
    fn from_tasks_buckets_by_status() {
        let board = BoardState::from_tasks(vec![
            task("a.md", Status::Done),
            task("b.md", Status::Todo),
            task("c.md", Status::Done),
        ]);
        assert_eq!(board.column(Status::Done).len(), 2);
        assert_eq!(board.column(Status::Todo).len(), 1);
        assert_eq!(board.find("c.md"), Some((Status::Done, 1)));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn remove_takes_task_out_of_its_column() {
        let mut board = BoardState::from_tasks(vec![task("a.md", Status::Doing)]);
        let removed = board.remove("a.md").unwrap();
        assert_eq!(removed.status, Status::Doing);
        assert!(board.get("a.md").is_none());
        assert!(board.remove("a.md").is_none());
    }

    #[test]
    fn time_filter_parses_and_labels() {
        assert_eq!("Week".parse::<TimeFilter>(), Ok(TimeFilter::Week));
        assert!("month".parse::<TimeFilter>().is_err());
        assert_eq!(TimeFilter::Today.label(), "Today");
        assert_eq!(TimeFilter::default(), TimeFilter::All);
    }
}
