//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Valid config keys for validation
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "data_dir",
    "catalog_url",
    "clip_min_secs",
    "clip_max_secs",
];

/// voice-tasks - guided voice task capture
#[derive(Parser, Debug)]
#[command(name = "voice-tasks")]
#[command(version = "0.1.0")]
#[command(about = "Guided capture of short voice recordings: read, describe, photograph")]
#[command(long_about = None)]
pub struct Cli {
    /// Data directory for the task store and captured media
    #[arg(
        long,
        value_name = "DIR",
        env = "VOICE_TASKS_DATA_DIR",
        global = true
    )]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a guided capture task
    Task {
        #[command(subcommand)]
        kind: TaskCommand,
    },
    /// List completed tasks, most recent first
    History {
        /// Show at most this many entries
        #[arg(short, long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Show one task in full
    Show {
        /// Task id (full id or unique prefix)
        id: String,
    },
    /// Replay a task's audio clip
    Play {
        /// Task id (full id or unique prefix)
        id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Guided task kinds
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Fetch a passage and read it aloud
    TextReading,
    /// Fetch a product image and describe it aloud
    ImageDescription,
    /// Attach a photo, optionally with a spoken or written description
    PhotoCapture {
        /// Image file to import
        #[arg(long, value_name = "FILE")]
        image: PathBuf,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
