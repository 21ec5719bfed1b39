//! Recording adapters

pub mod cpal_session;
pub mod flac_writer;

pub use cpal_session::CpalSession;
