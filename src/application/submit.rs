//! Task submission use case
//!
//! Gates a finished recording against the duration window, and turns a
//! validated draft into a persisted Task record with a fresh id and
//! timestamp.

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::clip::{ClipRejection, ClipWindow, RecordedClip};
use crate::domain::task::{Task, TaskType};

use super::ports::{FinishedRecording, StoreError, TaskStore};

/// Errors from the submit use case
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Task is missing required fields for {task_type}")]
    Incomplete { task_type: TaskType },

    #[error("Failed to save task: {0}")]
    Store(#[from] StoreError),
}

/// Draft of a task before id and timestamp are minted.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
    pub duration_sec: u32,
}

impl NewTask {
    /// Required-field completeness per task type. The store itself never
    /// enforces cross-field constraints; this is the last gate before it.
    fn is_complete_for(&self, task_type: TaskType) -> bool {
        match task_type {
            TaskType::TextReading => self.text.is_some() && self.audio_path.is_some(),
            TaskType::ImageDescription => self.image_url.is_some() && self.audio_path.is_some(),
            TaskType::PhotoCapture => self.image_path.is_some(),
        }
    }
}

/// Apply the duration gate to a finished take. A rejected take's backing
/// file is deleted immediately; the rejection is a value for the UI to
/// show, not a crash.
pub fn gate_recording(
    finished: FinishedRecording,
    window: &ClipWindow,
) -> Result<RecordedClip, ClipRejection> {
    match window.check(finished.elapsed) {
        Ok(duration_sec) => Ok(RecordedClip {
            path: finished.path,
            duration_sec,
        }),
        Err(rejection) => {
            let _ = std::fs::remove_file(&finished.path);
            Err(rejection)
        }
    }
}

/// A persisted task plus side information from the store.
#[derive(Debug, Clone)]
pub struct Submission {
    pub task: Task,
    /// Where a previously unreadable history document was moved, if the
    /// store had to start over from a damaged file.
    pub preserved_corrupt: Option<PathBuf>,
}

/// Builds and persists task records.
pub struct TaskSubmitter<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskSubmitter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate the draft, mint id and timestamp, and append to the store.
    /// An append failure surfaces distinctly so the caller can tell the
    /// user exactly what was not saved; a history document the store had
    /// to move aside travels up in the submission.
    pub async fn submit(
        &self,
        task_type: TaskType,
        draft: NewTask,
    ) -> Result<Submission, SubmitError> {
        if !draft.is_complete_for(task_type) {
            return Err(SubmitError::Incomplete { task_type });
        }

        let task = Task {
            id: Uuid::new_v4().to_string(),
            task_type,
            text: draft.text,
            image_url: draft.image_url,
            image_path: draft.image_path,
            audio_path: draft.audio_path,
            duration_sec: draft.duration_sec,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let report = self.store.append(task.clone()).await?;
        Ok(Submission {
            task,
            preserved_corrupt: report.preserved_corrupt,
        })
    }
}
