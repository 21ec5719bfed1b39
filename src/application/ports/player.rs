//! Playback port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to open audio file: {0}")]
    OpenFailed(String),

    #[error("No audio output device available")]
    NoOutputDevice,
}

/// How a playback session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The clip played to its natural end.
    Finished,
    /// `stop` preempted it (explicitly or by a newer `play`).
    Stopped,
    /// The output device failed after playback was accepted.
    Failed(String),
}

/// Single-fire completion signal for one playback session. Stopping the
/// session resolves the pending signal as `Stopped` instead of leaving the
/// waiter hanging.
#[derive(Debug)]
pub struct PlaybackHandle {
    rx: oneshot::Receiver<PlaybackEnd>,
}

impl PlaybackHandle {
    pub fn new(rx: oneshot::Receiver<PlaybackEnd>) -> Self {
        Self { rx }
    }

    /// Wait for the session to end. A dropped sender counts as stopped.
    pub async fn finished(self) -> PlaybackEnd {
        self.rx.await.unwrap_or(PlaybackEnd::Stopped)
    }
}

/// Port for clip playback.
///
/// At most one playback session is active at a time: `play` preempts any
/// active session unconditionally, no queueing.
#[async_trait]
pub trait ClipPlayer: Send + Sync {
    /// Start playing the given file, preempting any active session. Open
    /// and decode failures surface here; device failures after acceptance
    /// resolve the returned handle as `Failed`.
    async fn play(&self, path: &Path) -> Result<PlaybackHandle, PlaybackError>;

    /// Stop and release the active session, if any. No-op when idle.
    async fn stop(&self);
}
