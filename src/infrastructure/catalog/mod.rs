//! Catalog adapters

pub mod dummyjson;

pub use dummyjson::DummyJsonCatalog;
