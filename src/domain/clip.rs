//! Clip duration policy value objects

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use thiserror::Error;

/// Default minimum accepted clip length in seconds (inclusive)
pub const DEFAULT_MIN_CLIP_SECS: u64 = 10;

/// Default maximum accepted clip length in seconds (inclusive)
pub const DEFAULT_MAX_CLIP_SECS: u64 = 20;

/// Why a recording was rejected by the duration gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClipRejection {
    #[error("Recording too short (min {min} s).")]
    TooShort { min: u64 },

    #[error("Recording too long (max {max} s).")]
    TooLong { max: u64 },
}

/// Accepted duration window for a recorded clip.
///
/// The gate measures wall-clock time from press to release, truncated to
/// whole seconds. It never decodes the audio stream, so it can disagree
/// with the codec's notion of duration under heavy scheduling delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    min_secs: u64,
    max_secs: u64,
}

impl ClipWindow {
    /// Create a window accepting `[min_secs, max_secs]` inclusive.
    pub const fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// The default [10, 20] second window.
    pub const fn default_window() -> Self {
        Self::new(DEFAULT_MIN_CLIP_SECS, DEFAULT_MAX_CLIP_SECS)
    }

    pub const fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub const fn max_secs(&self) -> u64 {
        self.max_secs
    }

    /// Gate a measured elapsed time, returning the truncated whole-second
    /// duration when accepted.
    pub fn check(&self, elapsed: StdDuration) -> Result<u32, ClipRejection> {
        let secs = elapsed.as_secs();
        if secs < self.min_secs {
            Err(ClipRejection::TooShort { min: self.min_secs })
        } else if secs > self.max_secs {
            Err(ClipRejection::TooLong { max: self.max_secs })
        } else {
            Ok(secs as u32)
        }
    }
}

impl Default for ClipWindow {
    fn default() -> Self {
        Self::default_window()
    }
}

/// A recording that passed the duration gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedClip {
    pub path: PathBuf,
    pub duration_sec: u32,
}
