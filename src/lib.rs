//! # arxiv-crawler
//!
//! Crawl arXiv's search listing for papers matching a set of keyword phrases,
//! download the PDFs of papers not seen before into a dated folder, and keep a
//! CSV ledger of everything downloaded so later runs skip it.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PaperRecord, SearchQuery, YearMonth)
//! - [`parser`]: Lazy extraction of records from a search results page
//! - [`ledger`]: CSV-backed deduplication ledger
//! - [`sources`]: The [`Fetcher`] trait with HTTP and mock implementations
//! - [`crawler`]: One crawl run, from search to ledger update
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal output and interactive prompting
//! - [`utils`]: HTTP client

pub mod config;
pub mod crawler;
pub mod ledger;
pub mod models;
pub mod parser;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use crawler::{CrawlError, CrawlSummary, Crawler};
pub use ledger::Ledger;
pub use models::{PaperRecord, SearchQuery, YearMonth};
pub use sources::{ArxivFetcher, Fetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
