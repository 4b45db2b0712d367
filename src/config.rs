//! Client configuration.
//!
//! Defaults can be overridden by a YAML file, which the CLI flags and
//! environment variables override in turn:
//!
//! ```yaml
//! base_url: http://localhost:5000
//! page_size: 6
//! request_timeout_secs: 10
//! ```

use crate::error::{ContentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_PAGE_SIZE: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin serving `/api/content` and `/api/scrape`.
    pub base_url: String,
    /// Articles per page.
    pub page_size: u32,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_yaml::from_str(yaml).map_err(|e| ContentError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ContentError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_yaml(&yaml)?;
        info!(base_url = %config.base_url, page_size = config.page_size, "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ContentError::Config("page_size must be at least 1".to_string()));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.page_size, 6);
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ClientConfig::from_yaml("page_size: 9\n").unwrap();
        assert_eq!(config.page_size, 9);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "base_url: http://blog.internal:8080\npage_size: 12\nrequest_timeout_secs: 5\n";
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "http://blog.internal:8080");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = ClientConfig::from_yaml("page_size: 0\n").unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let err = ClientConfig::from_yaml("base_url: not a url\n").unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ClientConfig::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }
}
