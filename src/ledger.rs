//! Persistent record of downloaded papers.
//!
//! The ledger is a flat CSV table with the columns
//! `Download Date,YearMonth,Title,Journal,First Author`. It is read in full at
//! the start of a run to learn which titles are already known and extended at
//! the end of a run with the newly crawled batch.
//!
//! Appends are a read-modify-write of the whole file. There is no locking, so
//! only one crawl may run against a ledger at a time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::models::{PaperRecord, YearMonth};

/// Column names of the persisted table, in order
pub const LEDGER_COLUMNS: [&str; 5] = [
    "Download Date",
    "YearMonth",
    "Title",
    "Journal",
    "First Author",
];

/// Errors raised while reading or writing the ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("IO error on ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One persisted row
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Download Date")]
    download_date: String,
    #[serde(rename = "YearMonth")]
    year_month: YearMonth,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Journal")]
    journal: String,
    #[serde(rename = "First Author")]
    first_author: String,
}

impl From<&PaperRecord> for LedgerRow {
    fn from(record: &PaperRecord) -> Self {
        Self {
            download_date: record.download_date.clone(),
            year_month: record.year_month,
            title: record.title.clone(),
            journal: record.journal.clone(),
            first_author: record.first_author.clone(),
        }
    }
}

impl From<LedgerRow> for PaperRecord {
    fn from(row: LedgerRow) -> Self {
        Self {
            title: row.title,
            first_author: row.first_author,
            year_month: row.year_month,
            pdf_link: None,
            journal: row.journal,
            download_date: row.download_date,
        }
    }
}

/// CSV-backed deduplication ledger
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Use the ledger at `path` without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the ledger at `path`, creating a header-only table if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let ledger = Self::new(path);
        ledger.ensure_file()?;
        Ok(ledger)
    }

    /// Ensure the ledger file and its parent directory exist
    fn ensure_file(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::io(parent, e))?;
        }
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "Creating empty ledger");
            self.write_all(&[])?;
        }
        Ok(())
    }

    /// Read every persisted record; a missing ledger reads as empty
    pub fn load_all(&self) -> Result<Vec<PaperRecord>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| LedgerError::io(&self.path, e))?;
        let mut reader = csv::Reader::from_reader(file);
        let records = reader
            .deserialize::<LedgerRow>()
            .map(|row| row.map(PaperRecord::from))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = records.len(), "Loaded ledger");
        Ok(records)
    }

    /// Project records onto the set of their titles
    pub fn title_set(records: &[PaperRecord]) -> HashSet<String> {
        records.iter().map(|r| r.title.clone()).collect()
    }

    /// Titles of every paper recorded so far
    pub fn known_titles(&self) -> Result<HashSet<String>, LedgerError> {
        Ok(Self::title_set(&self.load_all()?))
    }

    /// Append a batch after the existing rows and persist the whole table
    ///
    /// Existing rows are never removed or reordered. The caller is trusted to
    /// pass only titles absent from [`Ledger::known_titles`].
    pub fn append_batch(&self, batch: &[PaperRecord]) -> Result<(), LedgerError> {
        let mut records = self.load_all()?;
        records.extend_from_slice(batch);
        self.write_all(&records)?;
        tracing::info!(added = batch.len(), total = records.len(), "Updated ledger");
        Ok(())
    }

    /// Replace the table contents, going through a temp file and rename
    fn write_all(&self, records: &[PaperRecord]) -> Result<(), LedgerError> {
        let tmp = self.path.with_extension("csv.tmp");
        {
            let file = File::create(&tmp).map_err(|e| LedgerError::io(&tmp, e))?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(LEDGER_COLUMNS)?;
            for record in records {
                writer.serialize(LedgerRow::from(record))?;
            }
            writer.flush().map_err(|e| LedgerError::io(&tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| LedgerError::io(&self.path, e))
    }

    /// Ledger file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
