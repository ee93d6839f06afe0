pub mod config_io;
pub mod state;
pub mod store;
pub mod vault_io;
pub mod watcher;
