use chrono::{DateTime, Local};

use crate::io::store::{ChangeFeed, DocumentStore, StoreError};
use crate::model::board::{BoardState, TimeFilter};
use crate::model::config::BoardConfig;
use crate::model::task::{Status, Task};
use crate::ops::classify::{is_task, load_column, load_tasks};
use crate::ops::new_task::{new_task_document, new_task_header, new_task_path};
use crate::ops::order::{compute_insertion_key, sort_column};
use crate::ops::time_filter::is_visible;
use crate::parse::{FrontmatterError, parse_frontmatter, serialize_frontmatter};

/// Error type for board operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not save {path}: {source}")]
    Persist { path: String, source: StoreError },
    #[error(transparent)]
    Header(#[from] FrontmatterError),
}

/// Why a move did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document no longer exists
    NotFound,
    /// The document exists but could not be read
    Unreadable,
    /// The document has no usable header
    NoMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Persisted and applied to the board
    Moved { status: Status, order: f64 },
    Skipped(SkipReason),
}

/// A board computed from the store but not yet shown.
///
/// Produced by `prepare_load` and applied by `commit_load`. A pending load
/// goes stale when a move or create lands, or the filter changes, between
/// the two.
#[derive(Debug)]
pub struct PendingLoad {
    generation: u64,
    filter: TimeFilter,
    board: BoardState,
}

impl PendingLoad {
    pub fn board(&self) -> &BoardState {
        &self.board
    }
}

/// Owns the board: loads it from a document store, keeps it filtered and
/// sorted, and writes moves back to the documents.
pub struct BoardCoordinator<S: DocumentStore> {
    store: S,
    config: BoardConfig,
    filter: TimeFilter,
    board: BoardState,
    /// Bumped by every persisted move or create
    generation: u64,
    feed: Option<Box<dyn ChangeFeed>>,
    clock: fn() -> DateTime<Local>,
}

impl<S: DocumentStore> BoardCoordinator<S> {
    pub fn new(store: S, config: BoardConfig) -> Self {
        let filter = config.board.default_filter;
        BoardCoordinator {
            store,
            config,
            filter,
            board: BoardState::new(),
            generation: 0,
            feed: None,
            clock: Local::now,
        }
    }

    pub fn with_filter(mut self, filter: TimeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the wall clock used by the time filter and new-task names.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    fn task_tag(&self) -> &str {
        &self.config.board.task_tag
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Rebuild the board from the store.
    pub fn load_board(&mut self) -> Result<&BoardState, BoardError> {
        let pending = self.prepare_load()?;
        self.commit_load(pending);
        Ok(&self.board)
    }

    /// Read and classify every document, then filter and sort. Does not
    /// touch the visible board.
    pub fn prepare_load(&self) -> Result<PendingLoad, StoreError> {
        let now = (self.clock)();
        let tasks = load_tasks(&self.store, self.task_tag())?;
        let total = tasks.len();
        let visible = tasks
            .into_iter()
            .filter(|t| is_visible(t, self.filter, now));

        let mut board = BoardState::from_tasks(visible);
        for status in Status::ALL {
            sort_column(board.column_mut(status));
        }
        tracing::debug!(
            tasks = total,
            visible = board.len(),
            filter = %self.filter,
            "prepared board"
        );
        Ok(PendingLoad {
            generation: self.generation,
            filter: self.filter,
            board,
        })
    }

    /// Show a prepared board. Returns false, leaving the board as it is, when
    /// the load went stale.
    pub fn commit_load(&mut self, pending: PendingLoad) -> bool {
        if pending.generation != self.generation || pending.filter != self.filter {
            tracing::debug!(
                prepared_at = pending.generation,
                current = self.generation,
                "discarding stale board load"
            );
            return false;
        }
        self.board = pending.board;
        true
    }

    /// Switch the time filter and reload.
    pub fn set_time_filter(&mut self, filter: TimeFilter) -> Result<&BoardState, BoardError> {
        self.filter = filter;
        self.load_board()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Move a task to `status`, optionally at `index` within that column.
    ///
    /// The new order key is computed from the column as currently persisted,
    /// not from the (possibly filtered) board. Without an index the task keeps
    /// its key. The board is patched only once the document is written.
    pub fn move_task(
        &mut self,
        path: &str,
        status: Status,
        index: Option<usize>,
    ) -> Result<MoveOutcome, BoardError> {
        let Some(info) = self.store.lookup(path) else {
            tracing::debug!(path, "move target not found");
            return Ok(MoveOutcome::Skipped(SkipReason::NotFound));
        };
        // The store's own spelling of the path; the board is keyed by it
        let path = info.path.as_str();
        let text = match self.store.read(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path, error = %e, "move target unreadable");
                return Ok(MoveOutcome::Skipped(SkipReason::Unreadable));
            }
        };
        let Some(mut fm) = parse_frontmatter(&text) else {
            tracing::debug!(path, "move target has no frontmatter");
            return Ok(MoveOutcome::Skipped(SkipReason::NoMetadata));
        };

        fm.set_str("status", status.as_str());
        if let Some(index) = index {
            let mut column = load_column(&self.store, self.task_tag(), status)?;
            sort_column(&mut column);
            fm.set_number("order", compute_insertion_key(&column, index));
        }

        let updated = serialize_frontmatter(&text, &fm)?;
        if let Err(source) = self.store.write(path, &updated) {
            tracing::error!(path, error = %source, "failed to persist move");
            return Err(BoardError::Persist {
                path: path.to_string(),
                source,
            });
        }

        let task = Task::from_frontmatter(path, &info.basename, info.created_at, &fm);
        let order = task.order;
        self.generation += 1;
        self.board.remove(path);
        if is_task(&fm, self.task_tag()) {
            self.place(task);
        }
        tracing::info!(path, status = %status, order, "moved task");
        Ok(MoveOutcome::Moved { status, order })
    }

    /// Create a new task document in `status` and add it to the board.
    pub fn create_task(&mut self, status: Status) -> Result<Task, BoardError> {
        let now = (self.clock)();
        let new_task = &self.config.new_task;
        let path = new_task_path(&new_task.folder, now.naive_local());
        let text = new_task_document(self.task_tag(), status, &new_task.priority);

        let info = self.store.create(&path, &text)?;
        let fm = new_task_header(self.task_tag(), status, &new_task.priority);
        let task = Task::from_frontmatter(&info.path, &info.basename, info.created_at, &fm);

        self.generation += 1;
        self.place(task.clone());
        tracing::info!(path = %info.path, status = %status, "created task");
        Ok(task)
    }

    /// Insert a task into its column if the active filter shows it.
    fn place(&mut self, task: Task) {
        if !is_visible(&task, self.filter, (self.clock)()) {
            return;
        }
        let column = self.board.column_mut(task.status);
        column.push(task);
        sort_column(column);
    }

    // -----------------------------------------------------------------------
    // Change feed
    // -----------------------------------------------------------------------

    /// Subscribe to store changes. Replaces any existing subscription.
    pub fn attach_watcher(&mut self) -> Result<(), BoardError> {
        self.feed = Some(self.store.watch()?);
        Ok(())
    }

    /// Drop the subscription, if any.
    pub fn detach_watcher(&mut self) {
        self.feed = None;
    }

    pub fn is_watching(&self) -> bool {
        self.feed.is_some()
    }

    /// Drain pending change events and reload if there were any.
    /// Returns whether the board was reloaded.
    pub fn poll_changes(&mut self) -> Result<bool, BoardError> {
        let events = match &self.feed {
            Some(feed) => feed.poll(),
            None => return Ok(false),
        };
        if events.is_empty() {
            return Ok(false);
        }
        tracing::debug!(events = events.len(), "store changed, reloading");
        self.load_board()?;
        Ok(true)
    }
}
