//! dummyjson.com catalog adapter

use async_trait::async_trait;
use std::time::Duration as StdDuration;

use crate::application::ports::{CatalogClient, CatalogError};
use crate::domain::catalog::CatalogPage;
use crate::domain::config::app_config::DEFAULT_CATALOG_URL;

/// Bound on each catalog request; the endpoint is best-effort filler
/// content, not worth waiting longer for.
const HTTP_TIMEOUT: StdDuration = StdDuration::from_secs(15);

/// Product catalog client for the dummyjson-style `/products` endpoint.
pub struct DummyJsonCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl DummyJsonCatalog {
    /// Create a client against the default public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CATALOG_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn page_url(&self, limit: u32) -> String {
        format!(
            "{}/products?limit={}",
            self.base_url.trim_end_matches('/'),
            limit
        )
    }
}

impl Default for DummyJsonCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for DummyJsonCatalog {
    async fn fetch_page(&self, limit: u32) -> Result<CatalogPage, CatalogError> {
        let url = self.page_url(limit);

        let response = self
            .client
            .get(&url)
            .timeout(HTTP_TIMEOUT)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Transport(format!("HTTP {}", status)));
        }

        response
            .json::<CatalogPage>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}
