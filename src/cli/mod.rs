//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, the config command
//! handler, and the interactive task runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{load_merged_config, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, TaskCommand};
pub use presenter::Presenter;
