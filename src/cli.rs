//! Command-line interface definitions for blogverse.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The API address can also come from the environment; everything else falls
//! back to the optional YAML config file and then to built-in defaults.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::Category;
use clap::Parser;

/// Command-line arguments for the blogverse reader.
///
/// # Examples
///
/// ```sh
/// # First page from a local backend
/// blogverse
///
/// # Re-scrape, then show page 2 of the Travel articles as JSON
/// blogverse --refresh --page 2 --category travel --json
///
/// # Different backend, nine articles per page
/// BLOGVERSE_API_URL=http://blog.internal:8080 blogverse --page-size 9
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the content API
    #[arg(short, long, env = "BLOGVERSE_API_URL")]
    pub base_url: Option<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Articles per page
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Trigger a backend scrape before showing the page
    #[arg(short, long)]
    pub refresh: bool,

    /// Only show articles in this category
    #[arg(long)]
    pub category: Option<Category>,

    /// Only show articles whose title, body, or author contain this text
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Print the snapshot as JSON instead of a text listing
    #[arg(long)]
    pub json: bool,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Layer flags over the config file over defaults.
    pub async fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path).await?,
            None => ClientConfig::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(timeout) = self.timeout_secs {
            config.request_timeout_secs = Some(timeout);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["blogverse"]);
        assert_eq!(cli.page, 1);
        assert!(cli.page_size.is_none());
        assert!(!cli.refresh);
        assert!(!cli.json);
        assert!(cli.category.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "blogverse",
            "--base-url",
            "http://blog.internal:8080",
            "-p",
            "3",
            "-n",
            "9",
            "--refresh",
            "--category",
            "travel",
            "-q",
            "patagonia",
            "--json",
        ]);

        assert_eq!(cli.base_url.as_deref(), Some("http://blog.internal:8080"));
        assert_eq!(cli.page, 3);
        assert_eq!(cli.page_size, Some(9));
        assert!(cli.refresh);
        assert_eq!(cli.category, Some(Category::Travel));
        assert_eq!(cli.search.as_deref(), Some("patagonia"));
        assert!(cli.json);
    }

    #[test]
    fn test_cli_rejects_page_zero_and_unknown_category() {
        assert!(Cli::try_parse_from(["blogverse", "--page", "0"]).is_err());
        assert!(Cli::try_parse_from(["blogverse", "--page-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["blogverse", "--category", "sports"]).is_err());
    }

    #[tokio::test]
    async fn test_resolve_config_overrides() {
        let cli = Cli::parse_from(["blogverse", "-n", "4", "--timeout-secs", "3"]);
        let config = cli.resolve_config().await.unwrap();
        assert_eq!(config.page_size, 4);
        assert_eq!(config.request_timeout_secs, Some(3));
        if cli.base_url.is_none() {
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }
    }

    #[tokio::test]
    async fn test_resolve_config_rejects_bad_url() {
        let cli = Cli::parse_from(["blogverse", "--base-url", "not a url"]);
        assert!(cli.resolve_config().await.is_err());
    }
}
