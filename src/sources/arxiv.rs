//! arXiv fetcher implementation.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::sources::{FetchError, Fetcher};
use crate::utils::HttpClient;

/// HTTP fetcher for the arXiv search listing and PDFs
///
/// The search listing is rendered server-side, so a plain GET returns the
/// same markup a browser would show. The configured settle delay is still
/// observed after each listing fetch.
#[derive(Debug, Clone)]
pub struct ArxivFetcher {
    client: Arc<HttpClient>,
    settle_delay: Duration,
}

impl ArxivFetcher {
    /// Create from fetch configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: Arc::new(HttpClient::from_config(config)?),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        })
    }
}

#[async_trait]
impl Fetcher for ArxivFetcher {
    async fn fetch_results_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!(url = %url, "Fetching arXiv results page");

        let html = self
            .client
            .get_checked(url, "text/html")
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read HTML: {}", e)))?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        tracing::debug!(bytes = html.len(), "Fetched results page");
        Ok(html)
    }

    async fn fetch_pdf_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.is_empty() {
            return Err(FetchError::InvalidRequest("Empty PDF URL".to_string()));
        }

        let bytes = self
            .client
            .get_checked(url, "application/pdf")
            .await?
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read PDF body: {}", e)))?;

        tracing::debug!(url = %url, bytes = bytes.len(), "Fetched PDF");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> ArxivFetcher {
        let config = FetchConfig {
            settle_delay_ms: 0,
            ..FetchConfig::default()
        };
        ArxivFetcher::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_results_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><ol></ol></body></html>")
            .create_async()
            .await;

        let url = format!("{}/search/?query=%22fairness%22&size=200", server.url());
        let html = fetcher().fetch_results_page(&url).await.unwrap();

        assert!(html.contains("<ol>"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_pdf_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pdf/2406.00001")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF-1.4 test")
            .create_async()
            .await;

        let url = format!("{}/pdf/2406.00001", server.url());
        let bytes = fetcher().fetch_pdf_bytes(&url).await.unwrap();

        assert_eq!(bytes, b"%PDF-1.4 test");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pdf/missing")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/pdf/missing", server.url());
        let err = fetcher().fetch_pdf_bytes(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_empty_pdf_url() {
        let err = fetcher().fetch_pdf_bytes("").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }
}
