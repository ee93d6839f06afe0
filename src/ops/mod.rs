pub mod classify;
pub mod new_task;
pub mod order;
pub mod time_filter;
