//! Task store adapters

pub mod json_file;

pub use json_file::JsonTaskStore;
