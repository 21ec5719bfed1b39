//! Task record entity

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of guided activity a task record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    TextReading,
    ImageDescription,
    PhotoCapture,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskType::TextReading => "text_reading",
            TaskType::ImageDescription => "image_description",
            TaskType::PhotoCapture => "photo_capture",
        };
        write!(f, "{}", label)
    }
}

/// One completed guided activity.
///
/// `id` and `timestamp` are minted at creation and never change. Which of
/// the optional fields are expected depends on `task_type`, but that is
/// validated before persistence, not by the store: the record itself only
/// guarantees shape. Unset optionals are omitted from the serialized form
/// and unknown keys are ignored on read, so the backing document survives
/// model growth in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    pub duration_sec: u32,
    pub timestamp: String,
}

impl Task {
    /// Short id prefix for list displays.
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}
