//! Utility modules supporting the crawler.
//!
//! - [`HttpClient`]: shared reqwest client configured from `[fetch]`

mod http;

pub use http::HttpClient;
