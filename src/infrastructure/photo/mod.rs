//! Photo adapters

pub mod jpeg_import;

pub use jpeg_import::{PhotoError, PhotoImporter};
