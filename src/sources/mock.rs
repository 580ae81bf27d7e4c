//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::sources::{FetchError, Fetcher};

/// A mock fetcher that serves predefined pages and PDFs.
///
/// Every requested URL is recorded so tests can assert on the request
/// sequence.
#[derive(Debug, Default)]
pub struct MockFetcher {
    results_page: Mutex<Option<String>>,
    pdfs: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the markup returned for any results page request.
    pub fn set_results_page(&self, markup: impl Into<String>) {
        let mut guard = self.results_page.lock().unwrap();
        *guard = Some(markup.into());
    }

    /// Serve `bytes` for `url`.
    pub fn add_pdf(&self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let mut guard = self.pdfs.lock().unwrap();
        guard.insert(url.into(), bytes.into());
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_results_page(&self, url: &str) -> Result<String, FetchError> {
        self.record(url);
        let guard = self.results_page.lock().unwrap();
        guard
            .clone()
            .ok_or_else(|| FetchError::Network(format!("No results page configured for {}", url)))
    }

    async fn fetch_pdf_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.record(url);
        let guard = self.pdfs.lock().unwrap();
        guard
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
