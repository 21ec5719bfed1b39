//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::clip::{ClipWindow, DEFAULT_MAX_CLIP_SECS, DEFAULT_MIN_CLIP_SECS};

/// Default catalog endpoint base
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_dir: Option<String>,
    pub catalog_url: Option<String>,
    pub clip_min_secs: Option<u64>,
    pub clip_max_secs: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            data_dir: None,
            catalog_url: Some(DEFAULT_CATALOG_URL.to_string()),
            clip_min_secs: Some(DEFAULT_MIN_CLIP_SECS),
            clip_max_secs: Some(DEFAULT_MAX_CLIP_SECS),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            data_dir: other.data_dir.or(self.data_dir),
            catalog_url: other.catalog_url.or(self.catalog_url),
            clip_min_secs: other.clip_min_secs.or(self.clip_min_secs),
            clip_max_secs: other.clip_max_secs.or(self.clip_max_secs),
        }
    }

    /// Get the data directory, defaulting to the platform data dir.
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("voice-tasks")
            })
    }

    /// Get the catalog base URL, or the dummyjson default.
    pub fn catalog_url_or_default(&self) -> &str {
        self.catalog_url.as_deref().unwrap_or(DEFAULT_CATALOG_URL)
    }

    /// Get the clip acceptance window, clamped so min never exceeds max.
    pub fn clip_window_or_default(&self) -> ClipWindow {
        let min = self.clip_min_secs.unwrap_or(DEFAULT_MIN_CLIP_SECS);
        let max = self.clip_max_secs.unwrap_or(DEFAULT_MAX_CLIP_SECS);
        ClipWindow::new(min.min(max), max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.data_dir.is_none());
        assert_eq!(config.catalog_url, Some(DEFAULT_CATALOG_URL.to_string()));
        assert_eq!(config.clip_min_secs, Some(10));
        assert_eq!(config.clip_max_secs, Some(20));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.data_dir.is_none());
        assert!(config.catalog_url.is_none());
        assert!(config.clip_min_secs.is_none());
        assert!(config.clip_max_secs.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            data_dir: Some("/base".to_string()),
            catalog_url: Some("https://base.example".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            data_dir: Some("/other".to_string()),
            catalog_url: None, // Should not override
            clip_min_secs: Some(5),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.data_dir, Some("/other".to_string()));
        assert_eq!(merged.catalog_url, Some("https://base.example".to_string()));
        assert_eq!(merged.clip_min_secs, Some(5));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            clip_max_secs: Some(30),
            ..Default::default()
        };
        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.clip_max_secs, Some(30));
    }

    #[test]
    fn data_dir_or_default_uses_configured_path() {
        let config = AppConfig {
            data_dir: Some("/tmp/vt".to_string()),
            ..Default::default()
        };
        assert_eq!(config.data_dir_or_default(), PathBuf::from("/tmp/vt"));
    }

    #[test]
    fn catalog_url_or_default_falls_back() {
        assert_eq!(
            AppConfig::empty().catalog_url_or_default(),
            DEFAULT_CATALOG_URL
        );
    }

    #[test]
    fn clip_window_or_default_uses_configured_bounds() {
        let config = AppConfig {
            clip_min_secs: Some(5),
            clip_max_secs: Some(8),
            ..Default::default()
        };
        let window = config.clip_window_or_default();
        assert_eq!(window.min_secs(), 5);
        assert_eq!(window.max_secs(), 8);
    }

    #[test]
    fn clip_window_clamps_inverted_bounds() {
        let config = AppConfig {
            clip_min_secs: Some(30),
            clip_max_secs: Some(20),
            ..Default::default()
        };
        let window = config.clip_window_or_default();
        assert!(window.min_secs() <= window.max_secs());
    }
}
