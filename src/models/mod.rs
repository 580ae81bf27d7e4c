//! Core data models for crawled papers and search runs.

mod paper;
mod period;
mod search;

pub use paper::{sanitize_title, PaperRecord, PaperRecordBuilder, ARXIV_JOURNAL};
pub use period::{YearMonth, YearMonthError};
pub use search::{SearchQuery, ARXIV_BASE_URL, RESULTS_PAGE_SIZE};
