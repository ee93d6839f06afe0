pub mod board;
pub mod config;
pub mod frontmatter;
pub mod task;

pub use board::*;
pub use config::*;
pub use frontmatter::*;
pub use task::*;
