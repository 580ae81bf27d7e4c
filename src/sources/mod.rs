//! Fetchers that retrieve search listings and PDFs.
//!
//! This module defines the [`Fetcher`] trait used by the crawler. The
//! production implementation is [`ArxivFetcher`], which talks HTTP to arXiv;
//! [`MockFetcher`] serves canned pages and PDFs so the parser, ledger and
//! crawler can be exercised without network access.
//!
//! # Runtime Configuration
//!
//! The HTTP fetcher takes its settings from the `[fetch]` section of the
//! configuration file, or the matching environment variables:
//!
//! - `ARXIV_CRAWLER_FETCH__BASE_URL` - arXiv base URL (default: `https://arxiv.org`)
//! - `ARXIV_CRAWLER_FETCH__SETTLE_DELAY_MS` - wait after loading the listing (default: 2000)
//! - `ARXIV_CRAWLER_FETCH__TIMEOUT_SECS` - HTTP request timeout (default: 30)

mod arxiv;
pub mod mock;

pub use arxiv::ArxivFetcher;
pub use mock::MockFetcher;

use async_trait::async_trait;

/// Capability interface for everything that touches the network.
///
/// Implementations are called strictly one request at a time.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Return the markup of the search results page at `url`
    async fn fetch_results_page(&self, url: &str) -> Result<String, FetchError>;

    /// Return the body of the PDF at `url`
    async fn fetch_pdf_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Errors that can occur while fetching
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing is served at the URL (mock fetcher)
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
