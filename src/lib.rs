//! VoiceTasks - guided voice task capture CLI
//!
//! This crate walks a user through recording-based capture tasks (reading a
//! fetched passage aloud, describing a product image, attaching and
//! describing a photo) and keeps the completed tasks in a local JSON store.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Task records, clip duration policy, catalog models, and the
//!   per-task-type flow state machines
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (JSON file store, cpal
//!   recording, rodio playback, dummyjson catalog, photo import)
//! - **CLI**: Command-line interface, argument parsing, and the interactive
//!   task runners

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
