//! Catalog client port interface

use async_trait::async_trait;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::domain::catalog::{CatalogItem, CatalogPage};

/// Bounded page size for catalog fetches (upstream endpoint max).
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// Catalog errors. Transport and decode failures stay distinct from an
/// empty catalog, which is not an error at all.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Transport(String),

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

/// Port for fetching filler content from the product catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of the catalog with the given page size.
    async fn fetch_page(&self, limit: u32) -> Result<CatalogPage, CatalogError>;

    /// Fetch a pseudo-randomly chosen item from one default-sized page.
    /// `Ok(None)` means the page was empty.
    async fn fetch_random_item(&self) -> Result<Option<CatalogItem>, CatalogError> {
        let page = self.fetch_page(DEFAULT_PAGE_LIMIT).await?;
        Ok(page.products.choose(&mut rand::thread_rng()).cloned())
    }
}
