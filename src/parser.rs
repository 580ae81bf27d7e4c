//! arXiv search listing parser.
//!
//! Turns one page of search results markup into [`PaperRecord`] values. Parsing
//! is lazy: [`ResultPage::records`] returns an iterator that stops as soon as
//! the requested number of new papers has been produced, leaving the rest of
//! the page untouched.
//!
//! Entries are handled independently. An entry whose title is already known
//! (from the ledger or earlier on the same page), whose announcement date is
//! missing, or which has no PDF link is dropped silently. A matched announcement date with an unrecognised month name is
//! the only fatal condition.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;
use url::Url;

use crate::models::{PaperRecord, PaperRecordBuilder, YearMonth, YearMonthError};

/// Errors that abort parsing of a results page
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A CSS selector or pattern failed to compile
    #[error("Invalid selector '{0}'")]
    Selector(String),

    /// The announcement date matched but its month name is not recognised
    #[error("Unknown month '{month}' in announcement date of '{title}'")]
    UnknownMonth { title: String, month: String },

    /// The announcement date matched but could not be converted
    #[error("Invalid announcement date '{text}' for '{title}'")]
    InvalidDate { title: String, text: String },
}

/// Selection rules applied to every entry on the page
#[derive(Debug, Clone)]
pub struct RecordFilter {
    known_titles: HashSet<String>,
    max: usize,
    download_date: String,
    window: Option<RangeInclusive<YearMonth>>,
}

impl RecordFilter {
    /// Accept at most `max` entries whose titles are not in `known_titles`
    pub fn new(known_titles: HashSet<String>, max: usize, download_date: impl Into<String>) -> Self {
        Self {
            known_titles,
            max,
            download_date: download_date.into(),
            window: None,
        }
    }

    /// Only accept entries announced inside `window`
    pub fn window(mut self, window: RangeInclusive<YearMonth>) -> Self {
        self.window = Some(window);
        self
    }

    pub fn is_known(&self, title: &str) -> bool {
        self.known_titles.contains(title)
    }
}

#[derive(Debug)]
struct Selectors {
    entry: Selector,
    title: Selector,
    announced: Selector,
    authors: Selector,
    link: Selector,
    announced_date: Regex,
}

impl Selectors {
    fn new() -> Result<Self, ParseError> {
        fn css(s: &str) -> Result<Selector, ParseError> {
            Selector::parse(s).map_err(|_| ParseError::Selector(s.to_string()))
        }

        let pattern = r"originally announced (\w+ \d{4})";
        Ok(Self {
            entry: css("li.arxiv-result")?,
            title: css("p.title")?,
            announced: css("p.is-size-7")?,
            authors: css("p.authors")?,
            link: css("a[href]")?,
            announced_date: Regex::new(pattern)
                .map_err(|_| ParseError::Selector(pattern.to_string()))?,
        })
    }
}

/// A parsed search results page
pub struct ResultPage {
    document: Html,
    selectors: Selectors,
    base_url: Option<Url>,
}

impl std::fmt::Debug for ResultPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPage")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ResultPage {
    /// Parse raw listing markup
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        Ok(Self {
            document: Html::parse_document(markup),
            selectors: Selectors::new()?,
            base_url: None,
        })
    }

    /// Resolve relative PDF links against `base_url`
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Number of result entries on the page, accepted or not
    pub fn entry_count(&self) -> usize {
        self.document.select(&self.selectors.entry).count()
    }

    /// Lazily produce accepted records in document order
    pub fn records<'a>(&'a self, filter: &'a RecordFilter) -> Records<'a> {
        Records {
            page: self,
            entries: self.document.select(&self.selectors.entry),
            filter,
            emitted: HashSet::new(),
            done: false,
        }
    }

    /// Extract one entry; `Ok(None)` means the entry is skipped
    fn extract(
        &self,
        entry: ElementRef<'_>,
        filter: &RecordFilter,
    ) -> Result<Option<PaperRecord>, ParseError> {
        let sel = &self.selectors;

        let Some(title) = first_text(entry, &sel.title) else {
            tracing::debug!("Skipping entry without a title");
            return Ok(None);
        };
        let title = title.trim().to_string();

        if filter.is_known(&title) {
            tracing::debug!(title = %title, "Skipping already downloaded paper");
            return Ok(None);
        }

        let announced = first_text(entry, &sel.announced).unwrap_or_default();
        let Some(date_text) = sel
            .announced_date
            .captures(&announced)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        else {
            tracing::debug!(title = %title, "Skipping entry without announcement date");
            return Ok(None);
        };

        let year_month = YearMonth::from_month_year(&date_text).map_err(|e| match e {
            YearMonthError::UnknownMonth(month) => ParseError::UnknownMonth {
                title: title.clone(),
                month,
            },
            YearMonthError::InvalidFormat(text) => ParseError::InvalidDate {
                title: title.clone(),
                text,
            },
        })?;

        if let Some(window) = &filter.window {
            if !window.contains(&year_month) {
                tracing::debug!(title = %title, %year_month, "Skipping paper outside date range");
                return Ok(None);
            }
        }

        let first_author = first_text(entry, &sel.authors)
            .map(|a| {
                a.replace("Authors:", "")
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();

        let Some(href) = entry
            .select(&sel.link)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.contains("pdf"))
        else {
            tracing::debug!(title = %title, "Skipping entry without PDF link");
            return Ok(None);
        };

        Ok(Some(
            PaperRecordBuilder::new(title, year_month, filter.download_date.clone())
                .first_author(first_author)
                .pdf_link(self.resolve_link(href))
                .build(),
        ))
    }

    fn resolve_link(&self, href: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

fn first_text(entry: ElementRef<'_>, selector: &Selector) -> Option<String> {
    entry
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>())
}

/// Lazy, finite stream of accepted records from a [`ResultPage`]
///
/// Ends after `max` records, after the last entry, or right after yielding a
/// fatal error. It cannot be restarted.
pub struct Records<'a> {
    page: &'a ResultPage,
    entries: scraper::html::Select<'a, 'a>,
    filter: &'a RecordFilter,
    emitted: HashSet<String>,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<PaperRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.emitted.len() >= self.filter.max {
            self.done = true;
            return None;
        }

        for entry in self.entries.by_ref() {
            match self.page.extract(entry, self.filter) {
                Ok(Some(record)) => {
                    if !self.emitted.insert(record.title.clone()) {
                        tracing::debug!(title = %record.title, "Skipping repeated title");
                        continue;
                    }
                    return Some(Ok(record));
                }
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.done = true;
        None
    }
}

impl FusedIterator for Records<'_> {}

/// Parse a page and collect accepted records
///
/// Convenience over [`ResultPage::records`] for callers that need an owned
/// batch; the parsed document is dropped before returning.
pub fn parse_results(
    markup: &str,
    base_url: Option<Url>,
    filter: &RecordFilter,
) -> Result<Vec<PaperRecord>, ParseError> {
    let mut page = ResultPage::parse(markup)?;
    if let Some(base) = base_url {
        page = page.with_base_url(base);
    }
    tracing::debug!(entries = page.entry_count(), "Parsed results page");
    let records: Result<Vec<_>, _> = page.records(filter).collect();
    records
}
