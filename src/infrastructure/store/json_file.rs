//! JSON file task store adapter
//!
//! One pretty-printed JSON document holding the full task array,
//! most-recent-first. Append is a full read-modify-rewrite under an async
//! mutex, written to a temp file and renamed into place so a crash
//! mid-write never leaves a torn document behind. An unreadable document
//! is moved aside, not deleted and not fatal.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::application::ports::{AppendReport, LoadOutcome, StoreError, TaskStore};
use crate::domain::task::Task;

/// Backing document name inside the data directory
const STORE_FILE_NAME: &str = "tasks.json";

/// JSON-document-backed task store.
pub struct JsonTaskStore {
    path: PathBuf,
    // Serializes the load-mutate-rewrite append sequence across callers
    lock: Mutex<()>,
}

impl JsonTaskStore {
    /// Create a store backed by `tasks.json` under the given data dir.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_path(data_dir.into().join(STORE_FILE_NAME))
    }

    /// Create with an explicit document path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn decode(text: &str) -> Result<Vec<Task>, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Move an unreadable document aside so it can still be inspected.
    async fn preserve_corrupt(&self) -> Option<PathBuf> {
        let millis = chrono::Utc::now().timestamp_millis();
        let file_name = format!("{}.corrupt-{}", STORE_FILE_NAME, millis);
        let target = self.path.with_file_name(file_name);
        match fs::rename(&self.path, &target).await {
            Ok(()) => Some(target),
            Err(_) => None,
        }
    }

    /// Read the document. Caller must hold the lock.
    async fn read_locked(&self) -> Result<LoadOutcome, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        match Self::decode(&text) {
            Ok(tasks) => Ok(LoadOutcome::Loaded(tasks)),
            Err(_) => Ok(LoadOutcome::Corrupt {
                preserved: self.preserve_corrupt().await,
            }),
        }
    }

    /// Rewrite the whole document atomically: temp file, fsync, rename.
    async fn write_locked(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let body =
            serde_json::to_vec_pretty(tasks).map_err(|e| StoreError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        file.write_all(&body)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl TaskStore for JsonTaskStore {
    async fn load_outcome(&self) -> Result<LoadOutcome, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_locked().await
    }

    async fn append(&self, task: Task) -> Result<AppendReport, StoreError> {
        let _guard = self.lock.lock().await;

        // A corrupt document has already been moved aside by read_locked,
        // so the rewrite starts from an empty list without destroying it.
        // Where it went travels up in the report.
        let (mut tasks, report) = match self.read_locked().await? {
            LoadOutcome::Loaded(tasks) => (tasks, AppendReport::default()),
            LoadOutcome::Missing => (Vec::new(), AppendReport::default()),
            LoadOutcome::Corrupt { preserved } => (
                Vec::new(),
                AppendReport {
                    preserved_corrupt: preserved,
                },
            ),
        };

        // Most recent first
        tasks.insert(0, task);

        self.write_locked(&tasks).await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_empty_array() {
        assert!(JsonTaskStore::decode("[]").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_invalid_syntax() {
        assert!(JsonTaskStore::decode("[{not json").is_err());
        assert!(JsonTaskStore::decode("{\"tasks\": 1}").is_err());
    }

    #[test]
    fn store_path_is_under_data_dir() {
        let store = JsonTaskStore::new("/data/voice-tasks");
        assert_eq!(store.path(), &PathBuf::from("/data/voice-tasks/tasks.json"));
    }
}
