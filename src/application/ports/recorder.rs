//! Recording port interface

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use thiserror::Error;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Timed out opening the audio input device")]
    StartTimeout,

    #[error("No audio input device available")]
    NoInputDevice,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Recording failed: {0}")]
    Failed(String),
}

/// A finalized take: the written clip file plus the wall-clock time from
/// start to stop. Duration gating works off this elapsed time, never the
/// encoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedRecording {
    pub path: PathBuf,
    pub elapsed: StdDuration,
}

/// Port for push-to-record audio capture.
///
/// At most one recording session is active at a time: `start` while active
/// preempts the previous take (stops and discards it) rather than queueing
/// or rejecting.
#[async_trait]
pub trait RecordingSession: Send + Sync {
    /// Begin a new take, returning the path of the clip file that `stop`
    /// will produce.
    async fn start(&self) -> Result<PathBuf, RecordingError>;

    /// Finalize the active take: close the capture device, write the clip
    /// file, and report the measured elapsed time. The session's internal
    /// reference is released even when the underlying stop fails.
    async fn stop(&self) -> Result<FinishedRecording, RecordingError>;

    /// Discard the active take without producing a file. No-op when idle.
    async fn cancel(&self) -> Result<(), RecordingError>;

    /// Check if currently recording
    fn is_recording(&self) -> bool;

    /// Wall-clock time since the active take started.
    fn elapsed(&self) -> StdDuration;
}
