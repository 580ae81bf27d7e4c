//! Crawl orchestration.
//!
//! One [`Crawler::run`] performs a single pass: fetch the results page, parse
//! new records against the ledger, download each PDF into a dated directory
//! and append the batch to the ledger. Steps run strictly in sequence.
//!
//! Callers that want per-paper progress pass a callback to
//! [`Crawler::run`]; it is invoked once per record as soon as that record's
//! PDF is handled, so a run that fails partway has already reported every
//! finished download.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::Config;
use crate::ledger::{Ledger, LedgerError};
use crate::models::{PaperRecord, SearchQuery};
use crate::parser::{parse_results, ParseError, RecordFilter};
use crate::sources::{FetchError, Fetcher};

/// Errors that abort a crawl run
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrawlError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What happened to one record's PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Fetched and written
    Downloaded { path: PathBuf, bytes: usize },
    /// A file with the same name was already on disk
    AlreadyPresent { path: PathBuf },
}

/// Result of one crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    /// Search URL that was fetched
    pub search_url: String,
    /// Dated directory PDFs were written to
    pub download_dir: PathBuf,
    /// Records appended to the ledger, in listing order
    pub records: Vec<PaperRecord>,
    /// Per-record download outcome, parallel to `records`
    pub outcomes: Vec<DownloadOutcome>,
}

impl CrawlSummary {
    /// Number of PDFs fetched during this run
    pub fn downloaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DownloadOutcome::Downloaded { .. }))
            .count()
    }
}

/// Runs crawls against one ledger and output directory
#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: F,
    ledger: Ledger,
    base_dir: PathBuf,
    base_url: Url,
    enforce_date_range: bool,
}

impl<F: Fetcher> Crawler<F> {
    /// Create a crawler from configuration, opening (or creating) the ledger
    pub fn new(fetcher: F, config: &Config) -> Result<Self, CrawlError> {
        let base_url =
            Url::parse(&config.fetch.base_url).map_err(|source| CrawlError::InvalidBaseUrl {
                url: config.fetch.base_url.clone(),
                source,
            })?;
        let ledger = Ledger::open(config.output.ledger_path())?;
        Ok(Self {
            fetcher,
            ledger,
            base_dir: config.output.base_dir.clone(),
            base_url,
            enforce_date_range: config.search.enforce_date_range,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run one crawl dated today, reporting each handled record to `progress`
    pub async fn run<P>(&self, query: &SearchQuery, progress: P) -> Result<CrawlSummary, CrawlError>
    where
        P: FnMut(&PaperRecord, &DownloadOutcome),
    {
        self.run_reporting(query, Local::now().date_naive(), progress)
            .await
    }

    /// Run one crawl as of `today` without progress reporting
    pub async fn run_on(
        &self,
        query: &SearchQuery,
        today: NaiveDate,
    ) -> Result<CrawlSummary, CrawlError> {
        self.run_reporting(query, today, |_, _| {}).await
    }

    /// Run one crawl as of `today`, reporting each handled record to `progress`
    pub async fn run_reporting<P>(
        &self,
        query: &SearchQuery,
        today: NaiveDate,
        mut progress: P,
    ) -> Result<CrawlSummary, CrawlError>
    where
        P: FnMut(&PaperRecord, &DownloadOutcome),
    {
        let today = today.format("%Y%m%d").to_string();
        let end = query.resolved_end();

        let download_dir = self.base_dir.join(&today);
        tokio::fs::create_dir_all(&download_dir)
            .await
            .map_err(|e| CrawlError::io(&download_dir, e))?;

        tracing::info!(
            start = %query.start,
            end = %end,
            keywords = ?query.keywords,
            "Crawling papers from arXiv"
        );

        let known_titles = self.ledger.known_titles()?;
        tracing::debug!(known = known_titles.len(), "Loaded known titles");

        let search_url = query.search_url(self.base_url.as_str());
        let markup = self.fetcher.fetch_results_page(&search_url).await?;

        let mut filter = RecordFilter::new(known_titles, query.max_results, today.as_str());
        if self.enforce_date_range {
            filter = filter.window(query.start..=end);
        }
        let records = parse_results(&markup, Some(self.base_url.clone()), &filter)?;
        tracing::info!(count = records.len(), "Found new papers");

        let mut outcomes = Vec::with_capacity(records.len());
        for record in &records {
            let outcome = self.download(record, &download_dir).await?;
            progress(record, &outcome);
            outcomes.push(outcome);
        }

        self.ledger.append_batch(&records)?;

        Ok(CrawlSummary {
            search_url,
            download_dir,
            records,
            outcomes,
        })
    }

    async fn download(
        &self,
        record: &PaperRecord,
        download_dir: &Path,
    ) -> Result<DownloadOutcome, CrawlError> {
        let path = download_dir.join(record.file_name());

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| CrawlError::io(&path, e))?;
        if exists {
            tracing::debug!(path = %path.display(), "PDF already on disk");
            return Ok(DownloadOutcome::AlreadyPresent { path });
        }

        let link = record.pdf_link.as_deref().ok_or_else(|| {
            FetchError::InvalidRequest(format!("No PDF link for '{}'", record.title))
        })?;
        let bytes = self.fetcher.fetch_pdf_bytes(link).await?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CrawlError::io(&path, e))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved PDF");
        Ok(DownloadOutcome::Downloaded {
            path,
            bytes: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockFetcher;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><body><ol>
<li class="arxiv-result">
  <p class="list-title"><a href="https://arxiv.org/abs/2406.00001">arXiv:2406.00001</a>
    <span>[<a href="https://arxiv.org/pdf/2406.00001">pdf</a>]</span></p>
  <p class="title is-5 mathjax">Fair AI: A/B Study</p>
  <p class="authors"><span>Authors:</span> <a href="/a/1">Ada Lovelace</a>, <a href="/a/2">Alan Turing</a></p>
  <p class="is-size-7">Submitted 2 June, 2024; originally announced June 2024.</p>
</li>
</ol></body></html>"#;

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.output.base_dir = dir.path().join("Papers");
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn test_run_downloads_and_records() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        fetcher.set_results_page(PAGE);
        fetcher.add_pdf("https://arxiv.org/pdf/2406.00001", b"%PDF".to_vec());

        let crawler = Crawler::new(fetcher, &config(&dir)).unwrap();
        let query = SearchQuery::new(["fairness"], "202301".parse().unwrap());
        let summary = crawler.run_on(&query, today()).await.unwrap();

        let expected = dir
            .path()
            .join("Papers")
            .join("20240701")
            .join("202406_Fair AI A-B Study.pdf");
        assert_eq!(summary.downloaded(), 1);
        assert_eq!(
            summary.outcomes,
            vec![DownloadOutcome::Downloaded {
                path: expected.clone(),
                bytes: 4
            }]
        );
        assert_eq!(std::fs::read(&expected).unwrap(), b"%PDF");

        let ledger = crawler.ledger().load_all().unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].title, "Fair AI: A/B Study");
        assert_eq!(ledger[0].first_author, "Ada Lovelace");
        assert_eq!(ledger[0].download_date, "20240701");
    }

    #[tokio::test]
    async fn test_existing_file_is_not_refetched() {
        let dir = TempDir::new().unwrap();
        let day_dir = dir.path().join("Papers").join("20240701");
        std::fs::create_dir_all(&day_dir).unwrap();
        std::fs::write(day_dir.join("202406_Fair AI A-B Study.pdf"), b"old").unwrap();

        let fetcher = MockFetcher::new();
        fetcher.set_results_page(PAGE);

        let crawler = Crawler::new(fetcher, &config(&dir)).unwrap();
        let query = SearchQuery::new(["fairness"], "202301".parse().unwrap());
        let summary = crawler.run_on(&query, today()).await.unwrap();

        assert_eq!(summary.downloaded(), 0);
        assert!(matches!(
            summary.outcomes[0],
            DownloadOutcome::AlreadyPresent { .. }
        ));
        // Still recorded in the ledger
        assert_eq!(crawler.ledger().load_all().unwrap().len(), 1);
        // Only the listing was requested
        assert_eq!(crawler.fetcher().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_progress_reported_before_failure() {
        let page = PAGE.replace(
            "</ol>",
            r#"<li class="arxiv-result">
  <p class="list-title"><a href="https://arxiv.org/pdf/2406.00002">pdf</a></p>
  <p class="title is-5 mathjax">Second Paper</p>
  <p class="authors"><a href="/a/3">Grace Hopper</a></p>
  <p class="is-size-7">originally announced June 2024.</p>
</li>
</ol>"#,
        );
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        fetcher.set_results_page(page);
        fetcher.add_pdf("https://arxiv.org/pdf/2406.00001", b"%PDF".to_vec());

        let crawler = Crawler::new(fetcher, &config(&dir)).unwrap();
        let query = SearchQuery::new(["fairness"], "202301".parse().unwrap());

        let mut reported = Vec::new();
        let result = crawler
            .run_reporting(&query, today(), |record, outcome| {
                reported.push((record.title.clone(), outcome.clone()));
            })
            .await;

        assert!(matches!(result, Err(CrawlError::Fetch(FetchError::NotFound(_)))));
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].0, "Fair AI: A/B Study");
        assert!(matches!(reported[0].1, DownloadOutcome::Downloaded { bytes: 4, .. }));
    }

    #[tokio::test]
    async fn test_existence_check_error_is_returned() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        std::fs::write(&not_a_dir, b"x").unwrap();

        let crawler = Crawler::new(MockFetcher::new(), &config(&dir)).unwrap();
        let record = PaperRecord::new("Lost", "202406".parse().unwrap(), "20240701");
        let err = crawler.download(&record, &not_a_dir).await.unwrap_err();

        assert!(matches!(err, CrawlError::Io { .. }));
        assert!(crawler.fetcher().requests().is_empty());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.fetch.base_url = "not a url".to_string();

        let err = Crawler::new(MockFetcher::new(), &config).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidBaseUrl { ref url, .. } if url == "not a url"));
        assert!(!config.output.ledger_path().exists());
    }

    #[tokio::test]
    async fn test_failed_download_skips_ledger_update() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        fetcher.set_results_page(PAGE);

        let crawler = Crawler::new(fetcher, &config(&dir)).unwrap();
        let query = SearchQuery::new(["fairness"], "202301".parse().unwrap());
        let err = crawler.run_on(&query, today()).await.unwrap_err();

        assert!(matches!(err, CrawlError::Fetch(FetchError::NotFound(_))));
        assert!(crawler.ledger().load_all().unwrap().is_empty());
    }
}
