//! Text reading flow state

use crate::domain::clip::{ClipRejection, RecordedClip};

/// Confirmation prompts the user must acknowledge before submitting.
pub const ACK_PROMPTS: [&str; 3] = [
    "No background noise",
    "No mistakes while reading",
    "The whole passage was read",
];

/// Events the text reading flow reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum TextReadingEvent {
    FetchStarted,
    PassageLoaded(String),
    PassageFailed(String),
    ClipAccepted(RecordedClip),
    ClipRejected(ClipRejection),
    ClipDiscarded,
    AckToggled(usize),
}

/// View state for the text reading capture screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextReadingFlow {
    pub passage: Option<String>,
    pub loading: bool,
    pub clip: Option<RecordedClip>,
    pub acks: [bool; 3],
    pub error: Option<String>,
}

impl TextReadingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reducer: consume an event, return the next state.
    pub fn apply(mut self, event: TextReadingEvent) -> Self {
        match event {
            TextReadingEvent::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            TextReadingEvent::PassageLoaded(text) => {
                self.loading = false;
                self.passage = Some(text);
            }
            TextReadingEvent::PassageFailed(message) => {
                self.loading = false;
                self.passage = None;
                self.error = Some(message);
            }
            TextReadingEvent::ClipAccepted(clip) => {
                self.clip = Some(clip);
                self.error = None;
            }
            TextReadingEvent::ClipRejected(rejection) => {
                self.clip = None;
                self.error = Some(rejection.to_string());
            }
            TextReadingEvent::ClipDiscarded => {
                self.clip = None;
                self.error = None;
            }
            TextReadingEvent::AckToggled(index) => {
                if let Some(ack) = self.acks.get_mut(index) {
                    *ack = !*ack;
                }
            }
        }
        self
    }

    /// Submission requires the passage, an accepted clip, and all three
    /// acknowledgements.
    pub fn can_submit(&self) -> bool {
        self.passage.is_some() && self.clip.is_some() && self.acks.iter().all(|a| *a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn clip() -> RecordedClip {
        RecordedClip {
            path: PathBuf::from("/data/audio_1.flac"),
            duration_sec: 12,
        }
    }

    fn ready_state() -> TextReadingFlow {
        TextReadingFlow::new()
            .apply(TextReadingEvent::PassageLoaded("passage".into()))
            .apply(TextReadingEvent::ClipAccepted(clip()))
            .apply(TextReadingEvent::AckToggled(0))
            .apply(TextReadingEvent::AckToggled(1))
            .apply(TextReadingEvent::AckToggled(2))
    }

    #[test]
    fn fresh_state_cannot_submit() {
        assert!(!TextReadingFlow::new().can_submit());
    }

    #[test]
    fn full_state_can_submit() {
        assert!(ready_state().can_submit());
    }

    #[test]
    fn missing_any_ack_blocks_submit() {
        let state = ready_state().apply(TextReadingEvent::AckToggled(1));
        assert!(!state.can_submit());
    }

    #[test]
    fn rejection_clears_clip_and_sets_error() {
        let state = ready_state().apply(TextReadingEvent::ClipRejected(
            ClipRejection::TooShort { min: 10 },
        ));
        assert!(state.clip.is_none());
        assert!(!state.can_submit());
        assert_eq!(
            state.error.as_deref(),
            Some("Recording too short (min 10 s).")
        );
    }

    #[test]
    fn discard_clears_clip_without_error() {
        let state = ready_state().apply(TextReadingEvent::ClipDiscarded);
        assert!(state.clip.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn passage_failure_blocks_submit() {
        let state = ready_state().apply(TextReadingEvent::PassageFailed("down".into()));
        assert!(!state.can_submit());
        assert_eq!(state.error.as_deref(), Some("down"));
    }

    #[test]
    fn ack_toggle_out_of_range_is_ignored() {
        let state = TextReadingFlow::new().apply(TextReadingEvent::AckToggled(7));
        assert_eq!(state.acks, [false; 3]);
    }

    #[test]
    fn accepting_a_new_clip_clears_stale_error() {
        let state = TextReadingFlow::new()
            .apply(TextReadingEvent::ClipRejected(ClipRejection::TooLong {
                max: 20,
            }))
            .apply(TextReadingEvent::ClipAccepted(clip()));
        assert!(state.error.is_none());
        assert!(state.clip.is_some());
    }
}
