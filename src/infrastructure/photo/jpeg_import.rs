//! Photo import adapter
//!
//! Brings a user-supplied image into the data directory as a compressed
//! JPEG (`photo_<uuid>.jpg`, quality 90), so the stored record never
//! points at a file outside the app's own storage.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;
use uuid::Uuid;

/// JPEG quality for imported photos
const JPEG_QUALITY: u8 = 90;

/// Photo import errors
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Failed to read photo: {0}")]
    Read(String),

    #[error("Failed to decode photo: {0}")]
    Decode(String),

    #[error("Failed to write photo: {0}")]
    Write(String),
}

/// Imports photos into the data directory.
pub struct PhotoImporter {
    out_dir: PathBuf,
}

impl PhotoImporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Decode `source` and re-encode it as a fresh JPEG in the data dir,
    /// returning the new path.
    pub fn import(&self, source: &Path) -> Result<PathBuf, PhotoError> {
        let img = image::open(source).map_err(|e| match e {
            image::ImageError::IoError(io) => PhotoError::Read(io.to_string()),
            other => PhotoError::Decode(other.to_string()),
        })?;

        fs::create_dir_all(&self.out_dir).map_err(|e| PhotoError::Write(e.to_string()))?;
        let dest = self.out_dir.join(format!("photo_{}.jpg", Uuid::new_v4()));

        let file = File::create(&dest).map_err(|e| PhotoError::Write(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);

        // JPEG has no alpha channel
        img.to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| PhotoError::Write(e.to_string()))?;

        Ok(dest)
    }
}
