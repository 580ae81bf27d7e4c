//! Search query model.

use serde::{Deserialize, Serialize};

use super::YearMonth;

/// Base URL for arXiv
pub const ARXIV_BASE_URL: &str = "https://arxiv.org";

/// Number of results requested from the arXiv listing (its largest page size)
pub const RESULTS_PAGE_SIZE: usize = 200;

/// Parameters for one crawl run
///
/// Keywords are combined with AND, each quoted for exact phrase matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Keyword phrases, all of which must match
    pub keywords: Vec<String>,

    /// First month of interest
    pub start: YearMonth,

    /// Last month of interest (defaults to the current month)
    pub end: Option<YearMonth>,

    /// Maximum number of new papers to collect
    pub max_results: usize,
}

impl SearchQuery {
    /// Create a new search query
    pub fn new<I, S>(keywords: I, start: YearMonth) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            start,
            end: None,
            max_results: 5,
        }
    }

    /// Set the end month
    pub fn end(mut self, end: YearMonth) -> Self {
        self.end = Some(end);
        self
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// End month, falling back to the current month
    pub fn resolved_end(&self) -> YearMonth {
        self.end.unwrap_or_else(YearMonth::current)
    }

    /// AND-joined, phrase-quoted keyword string, URL-encoded per phrase
    ///
    /// `["fairness", "machine learning"]` renders as
    /// `%22fairness%22+AND+%22machine%20learning%22`.
    pub fn query_string(&self) -> String {
        self.keywords
            .iter()
            .map(|k| urlencoding::encode(&format!("\"{}\"", k)).into_owned())
            .collect::<Vec<_>>()
            .join("+AND+")
    }

    /// Full search listing URL, newest announcements first
    pub fn search_url(&self, base_url: &str) -> String {
        format!(
            "{}/search/?query={}&searchtype=all&abstracts=show&order=-announced_date_first&size={}",
            base_url.trim_end_matches('/'),
            self.query_string(),
            RESULTS_PAGE_SIZE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_query_string() {
        let query = SearchQuery::new(["fairness", "machine learning"], ym("202301"));
        assert_eq!(
            query.query_string(),
            "%22fairness%22+AND+%22machine%20learning%22"
        );
    }

    #[test]
    fn test_search_url() {
        let query = SearchQuery::new(["fairness"], ym("202301"));
        assert_eq!(
            query.search_url(ARXIV_BASE_URL),
            "https://arxiv.org/search/?query=%22fairness%22&searchtype=all&abstracts=show&order=-announced_date_first&size=200"
        );
        // Trailing slash on the base is tolerated
        assert!(query
            .search_url("http://localhost:1234/")
            .starts_with("http://localhost:1234/search/?query="));
    }

    #[test]
    fn test_resolved_end_defaults_to_current() {
        let query = SearchQuery::new(["x"], ym("202301"));
        assert_eq!(query.resolved_end(), YearMonth::current());

        let query = query.end(ym("202312"));
        assert_eq!(query.resolved_end(), ym("202312"));
    }

    #[test]
    fn test_max_results_default_and_override() {
        let query = SearchQuery::new(["x"], ym("202301"));
        assert_eq!(query.max_results, 5);
        assert_eq!(query.max_results(3).max_results, 3);
    }
}
