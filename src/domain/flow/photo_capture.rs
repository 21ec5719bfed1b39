//! Photo capture flow state

use std::path::PathBuf;

use crate::domain::clip::{ClipRejection, RecordedClip};

/// Events the photo capture flow reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoCaptureEvent {
    PhotoAttached(PathBuf),
    PhotoCleared,
    DescriptionEdited(String),
    ClipAccepted(RecordedClip),
    ClipRejected(ClipRejection),
    ClipDiscarded,
}

/// View state for the photo capture screen.
///
/// The audio clip and description are both optional; the photo alone gates
/// submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoCaptureFlow {
    pub image_path: Option<PathBuf>,
    pub description: String,
    pub clip: Option<RecordedClip>,
    pub error: Option<String>,
}

impl PhotoCaptureFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reducer: consume an event, return the next state.
    pub fn apply(mut self, event: PhotoCaptureEvent) -> Self {
        match event {
            PhotoCaptureEvent::PhotoAttached(path) => {
                self.image_path = Some(path);
                self.error = None;
            }
            PhotoCaptureEvent::PhotoCleared => {
                self.image_path = None;
                self.description.clear();
                self.clip = None;
            }
            PhotoCaptureEvent::DescriptionEdited(text) => {
                self.description = text;
            }
            PhotoCaptureEvent::ClipAccepted(clip) => {
                self.clip = Some(clip);
                self.error = None;
            }
            PhotoCaptureEvent::ClipRejected(rejection) => {
                self.clip = None;
                self.error = Some(rejection.to_string());
            }
            PhotoCaptureEvent::ClipDiscarded => {
                self.clip = None;
                self.error = None;
            }
        }
        self
    }

    pub fn can_submit(&self) -> bool {
        self.image_path.is_some()
    }

    /// Typed description, None when left blank.
    pub fn description_text(&self) -> Option<String> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
