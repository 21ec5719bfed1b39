//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod catalog;
pub mod clip;
pub mod config;
pub mod error;
pub mod flow;
pub mod task;

// Re-export common types
pub use catalog::{CatalogItem, CatalogPage};
pub use clip::{ClipRejection, ClipWindow, RecordedClip};
pub use config::AppConfig;
pub use error::*;
pub use task::{Task, TaskType};
