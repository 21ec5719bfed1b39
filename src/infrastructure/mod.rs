//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the filesystem, audio devices, and the catalog API.

pub mod catalog;
pub mod config;
pub mod photo;
pub mod playback;
pub mod recording;
pub mod store;

// Re-export adapters
pub use catalog::DummyJsonCatalog;
pub use config::XdgConfigStore;
pub use photo::PhotoImporter;
pub use playback::RodioClipPlayer;
pub use recording::CpalSession;
pub use store::JsonTaskStore;
