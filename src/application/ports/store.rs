//! Task store port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::task::Task;

/// Task store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Failed to read task store: {0}")]
    Read(String),

    #[error("Failed to write task store: {0}")]
    Write(String),

    #[error("Failed to encode tasks: {0}")]
    Encode(String),
}

/// Outcome of reading the backing document, keeping "nothing exists"
/// distinguishable from "the document was unreadable".
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Document present and parsed, most-recent-first.
    Loaded(Vec<Task>),
    /// No backing document yet; a valid empty state.
    Missing,
    /// Document present but unparseable. The store moves it aside rather
    /// than deleting it; `preserved` is where it went, when that worked.
    Corrupt { preserved: Option<PathBuf> },
}

/// Side information from an append: set when the previous document was
/// unreadable and had to be moved aside before the rewrite. The caller
/// decides whether to tell the user; the store never swallows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendReport {
    pub preserved_corrupt: Option<PathBuf>,
}

/// Port for the durable, file-backed task list.
///
/// Append-only: no update, no delete, no query-by-id. Callers filter the
/// full sequence returned by `load_all`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Read the backing document with a typed outcome.
    async fn load_outcome(&self) -> Result<LoadOutcome, StoreError>;

    /// Read all tasks, most-recent-first.
    ///
    /// A missing or corrupt document degrades to an empty sequence so a
    /// damaged history file never takes the app down; callers that need to
    /// tell the cases apart use [`load_outcome`](Self::load_outcome).
    async fn load_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(match self.load_outcome().await? {
            LoadOutcome::Loaded(tasks) => tasks,
            LoadOutcome::Missing | LoadOutcome::Corrupt { .. } => Vec::new(),
        })
    }

    /// Prepend one task and rewrite the document.
    async fn append(&self, task: Task) -> Result<AppendReport, StoreError>;
}
