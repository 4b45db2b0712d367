//! Backend content API.
//!
//! The backend is an external collaborator exposing two endpoints:
//! - `GET /api/content?page={n}&per_page={m}`: one page of the listing
//! - `GET /api/scrape`: triggers server-side ingestion; the body is ignored
//!
//! # Architecture
//!
//! - [`ContentApi`]: the trait the store is written against
//! - [`HttpContentApi`]: the `reqwest` implementation
//!
//! Failures are terminal for the call that triggered them. Nothing here
//! retries or backs off; recovery is a user-initiated retry.

use crate::config::ClientConfig;
use crate::error::{ContentError, Result};
use crate::models::{ContentPage, ContentResponse};
use crate::utils::{looks_truncated, truncate_for_log};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

const CONTENT_PATH: &str = "api/content";
const SCRAPE_PATH: &str = "api/scrape";

/// Trait for async access to the content backend.
///
/// The store only ever talks to the backend through this trait, so tests and
/// alternative transports can stand in for HTTP.
pub trait ContentApi {
    /// Fetch the 1-based `page` of the listing with `per_page` articles per page.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<ContentPage>;

    /// Ask the backend to re-ingest its sources. Only success or failure matters.
    async fn trigger_scrape(&self) -> Result<()>;
}

impl<T> ContentApi for Arc<T>
where
    T: ContentApi,
{
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<ContentPage> {
        (**self).fetch_page(page, per_page).await
    }

    async fn trigger_scrape(&self) -> Result<()> {
        (**self).trigger_scrape().await
    }
}

/// [`ContentApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContentApi {
    client: reqwest::Client,
    /// Base URL, always ending in `/` so endpoint paths join beneath it.
    base: Url,
}

impl HttpContentApi {
    /// Client for `base_url` with reqwest defaults (no timeout).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Build the client described by `config`, applying its request timeout if set.
    ///
    /// # Errors
    ///
    /// [`ContentError::Config`] if the HTTP client cannot be built, or
    /// [`ContentError::InvalidUrl`] if the base URL is unusable.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ContentError::Config(e.to_string()))?;
        Self::with_client(&config.base_url, client)
    }

    /// Use a caller-built `reqwest::Client`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Absolute http(s) URL; endpoint paths are joined beneath
    ///   it, so `http://host/blog` serves `http://host/blog/api/content`.
    /// * `client` - Client carrying whatever timeouts or proxies the caller wants
    ///
    /// # Errors
    ///
    /// [`ContentError::InvalidUrl`] if `base_url` does not parse or cannot be
    /// a base (e.g. `mailto:`).
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ContentError::InvalidUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    /// Normalised base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL of the listing endpoint for one page.
    pub fn content_url(&self, page: u32, per_page: u32) -> Result<Url> {
        let mut url = self.base.join(CONTENT_PATH)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    /// URL of the scrape trigger.
    pub fn scrape_url(&self) -> Result<Url> {
        Ok(self.base.join(SCRAPE_PATH)?)
    }
}

impl ContentApi for HttpContentApi {
    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<ContentPage> {
        let url = self.content_url(page, per_page)?;
        let t0 = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "Content request failed");
            ContentError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Content request rejected by server");
            return Err(ContentError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ContentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                truncated = looks_truncated(&e),
                body_preview = %truncate_for_log(&body, 300),
                "Content response did not match the listing contract"
            );
            if looks_truncated(&e) {
                ContentError::Decode(format!("truncated body: {e}"))
            } else {
                ContentError::Decode(e.to_string())
            }
        })?;

        let content_page = parsed.into_page(page);
        info!(
            count = content_page.articles.len(),
            total = content_page.total,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched content page"
        );
        Ok(content_page)
    }

    #[instrument(level = "info", skip(self))]
    async fn trigger_scrape(&self) -> Result<()> {
        let url = self.scrape_url()?;
        let t0 = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Scrape request failed");
            ContentError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Scrape rejected by server");
            return Err(ContentError::Server {
                status: status.as_u16(),
            });
        }

        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Scrape completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve exactly one canned HTTP response and report the request line.
    async fn serve_once(status_line: &'static str, body: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let request = String::from_utf8_lossy(&request).to_string();
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}"), rx)
    }

    #[test]
    fn test_content_url() {
        let api = HttpContentApi::new("http://localhost:5000").unwrap();
        let url = api.content_url(2, 6).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/content?page=2&per_page=6");
        assert_eq!(api.scrape_url().unwrap().as_str(), "http://localhost:5000/api/scrape");
    }

    #[test]
    fn test_content_url_keeps_base_path() {
        let api = HttpContentApi::new("http://example.com/blog").unwrap();
        assert_eq!(
            api.content_url(1, 10).unwrap().as_str(),
            "http://example.com/blog/api/content?page=1&per_page=10"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpContentApi::new("localhost"),
            Err(ContentError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpContentApi::new("mailto:editor@example.com"),
            Err(ContentError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let body = r#"{"articles":[{"id":1,"title":"Hello","content":"World","author":"Ann","date":"2025-02-15T00:00:00Z","url":"https://example.com/1"}],"total":13}"#;
        let (base, request_line) = serve_once("200 OK", body.to_string()).await;
        let api = HttpContentApi::new(&base).unwrap();

        let page = api.fetch_page(3, 6).await.unwrap();
        assert_eq!(page.number, 3);
        assert_eq!(page.total, 13);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].title, "Hello");

        let line = request_line.await.unwrap();
        assert_eq!(line, "GET /api/content?page=3&per_page=6 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_page_server_error() {
        let (base, _) = serve_once("500 Internal Server Error", "{}".to_string()).await;
        let api = HttpContentApi::new(&base).unwrap();

        let err = api.fetch_page(1, 6).await.unwrap_err();
        assert_eq!(err, ContentError::Server { status: 500 });
    }

    #[tokio::test]
    async fn test_fetch_page_malformed_body() {
        let (base, _) = serve_once("200 OK", r#"{"articles": "nope"}"#.to_string()).await;
        let api = HttpContentApi::new(&base).unwrap();

        let err = api.fetch_page(1, 6).await.unwrap_err();
        assert!(matches!(err, ContentError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpContentApi::new(&format!("http://{addr}")).unwrap();
        let err = api.fetch_page(1, 6).await.unwrap_err();
        assert!(matches!(err, ContentError::Network(_)));
    }

    #[tokio::test]
    async fn test_trigger_scrape_ignores_body() {
        let (base, request_line) = serve_once("200 OK", "not json at all".to_string()).await;
        let api = HttpContentApi::new(&base).unwrap();

        api.trigger_scrape().await.unwrap();
        assert_eq!(request_line.await.unwrap(), "GET /api/scrape HTTP/1.1");
    }

    #[tokio::test]
    async fn test_trigger_scrape_failure() {
        let (base, _) = serve_once("503 Service Unavailable", String::new()).await;
        let api = HttpContentApi::new(&base).unwrap();

        let err = api.trigger_scrape().await.unwrap_err();
        assert_eq!(err, ContentError::Server { status: 503 });
    }
}
