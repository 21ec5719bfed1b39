//! Catalog content models
//!
//! Third-party product records used only as filler content for tasks: the
//! description doubles as a reading passage and the images as description
//! prompts. Decoding tolerates extra and missing optional fields since the
//! upstream payload is not under our control.

use serde::Deserialize;

/// One product entry from the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl CatalogItem {
    /// Best available image URL: first gallery image, else the thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.thumbnail.as_deref())
    }
}

/// One page of the catalog listing envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<CatalogItem>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}
