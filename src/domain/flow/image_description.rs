//! Image description flow state

use crate::domain::clip::{ClipRejection, RecordedClip};

/// Events the image description flow reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageDescriptionEvent {
    FetchStarted,
    ItemLoaded {
        title: String,
        image_url: Option<String>,
    },
    FetchFailed(String),
    ClipAccepted(RecordedClip),
    ClipRejected(ClipRejection),
    ClipDiscarded,
}

/// View state for the image description capture screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDescriptionFlow {
    pub item_title: Option<String>,
    pub image_url: Option<String>,
    pub loading: bool,
    pub clip: Option<RecordedClip>,
    pub error: Option<String>,
}

impl ImageDescriptionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reducer: consume an event, return the next state.
    pub fn apply(mut self, event: ImageDescriptionEvent) -> Self {
        match event {
            ImageDescriptionEvent::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            ImageDescriptionEvent::ItemLoaded { title, image_url } => {
                self.loading = false;
                self.item_title = Some(title);
                // An item without any image cannot be described
                if image_url.is_none() {
                    self.error = Some("Catalog item has no image".to_string());
                }
                self.image_url = image_url;
            }
            ImageDescriptionEvent::FetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            ImageDescriptionEvent::ClipAccepted(clip) => {
                self.clip = Some(clip);
                self.error = None;
            }
            ImageDescriptionEvent::ClipRejected(rejection) => {
                self.clip = None;
                self.error = Some(rejection.to_string());
            }
            ImageDescriptionEvent::ClipDiscarded => {
                self.clip = None;
                self.error = None;
            }
        }
        self
    }

    /// Submission requires a fetched image and an accepted clip.
    pub fn can_submit(&self) -> bool {
        self.image_url.is_some() && self.clip.is_some()
    }
}
