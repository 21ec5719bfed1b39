//! Per-task-type capture flow state machines
//!
//! Each flow is an explicit view-state snapshot updated by a pure
//! `apply(event)` reducer, so submission gating is testable without an
//! interactive harness. The CLI runner owns the side effects (fetching,
//! recording, file IO) and feeds the outcomes in as events.

pub mod image_description;
pub mod photo_capture;
pub mod text_reading;

pub use image_description::{ImageDescriptionEvent, ImageDescriptionFlow};
pub use photo_capture::{PhotoCaptureEvent, PhotoCaptureFlow};
pub use text_reading::{TextReadingEvent, TextReadingFlow, ACK_PROMPTS};
