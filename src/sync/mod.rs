pub mod coordinator;

pub use coordinator::{BoardCoordinator, BoardError, MoveOutcome, PendingLoad, SkipReason};
