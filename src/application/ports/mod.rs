//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod catalog;
pub mod config;
pub mod player;
pub mod recorder;
pub mod store;

// Re-export common types
pub use catalog::{CatalogClient, CatalogError, DEFAULT_PAGE_LIMIT};
pub use config::ConfigStore;
pub use player::{ClipPlayer, PlaybackEnd, PlaybackError, PlaybackHandle};
pub use recorder::{FinishedRecording, RecordingError, RecordingSession};
pub use store::{AppendReport, LoadOutcome, StoreError, TaskStore};
