//! Paper record model for crawled arXiv results.

use serde::{Deserialize, Serialize};

use super::YearMonth;

/// Journal name recorded for every paper found through arXiv search
pub const ARXIV_JOURNAL: &str = "arXiv";

/// One discovered paper
///
/// Records are created once, either by the result parser or when reading the
/// ledger back, and never mutated afterwards. The title is the deduplication
/// key across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title (whitespace-trimmed)
    pub title: String,

    /// First listed author
    pub first_author: String,

    /// Month the paper was originally announced
    pub year_month: YearMonth,

    /// Direct PDF URL (not persisted in the ledger)
    pub pdf_link: Option<String>,

    /// Journal or repository name
    pub journal: String,

    /// Date the record was created, `YYYYMMDD`
    pub download_date: String,
}

impl PaperRecord {
    /// Create a new arXiv record with required fields
    pub fn new(
        title: impl Into<String>,
        year_month: YearMonth,
        download_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            first_author: String::new(),
            year_month,
            pdf_link: None,
            journal: ARXIV_JOURNAL.to_string(),
            download_date: download_date.into(),
        }
    }

    /// Title with characters that are unsafe in file names removed
    ///
    /// Colons are dropped and slashes become dashes, so
    /// `"Fair AI: A/B Study"` becomes `"Fair AI A-B Study"`.
    pub fn sanitized_title(&self) -> String {
        sanitize_title(&self.title)
    }

    /// File name the PDF is stored under: `<YearMonth>_<sanitized title>.pdf`
    pub fn file_name(&self) -> String {
        format!("{}_{}.pdf", self.year_month, self.sanitized_title())
    }
}

/// Strip path-hostile characters from a title
pub fn sanitize_title(title: &str) -> String {
    title.replace(':', "").replace('/', "-")
}

/// Builder for constructing PaperRecord objects
#[derive(Debug, Clone)]
pub struct PaperRecordBuilder {
    record: PaperRecord,
}

impl PaperRecordBuilder {
    /// Create a new builder with required fields
    pub fn new(
        title: impl Into<String>,
        year_month: YearMonth,
        download_date: impl Into<String>,
    ) -> Self {
        Self {
            record: PaperRecord::new(title, year_month, download_date),
        }
    }

    /// Set first author
    pub fn first_author(mut self, author: impl Into<String>) -> Self {
        self.record.first_author = author.into();
        self
    }

    /// Set PDF link
    pub fn pdf_link(mut self, link: impl Into<String>) -> Self {
        self.record.pdf_link = Some(link.into());
        self
    }

    /// Build the PaperRecord
    pub fn build(self) -> PaperRecord {
        self.record
    }
}
