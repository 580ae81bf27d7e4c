//! Configuration management.

mod file_config;

pub use file_config::{find_config_file, load_config, save_config, to_toml, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::{YearMonth, ARXIV_BASE_URL};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where papers and the ledger are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Defaults offered by the interactive prompt
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory; each run writes PDFs to a dated subdirectory
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Ledger file name, relative to `base_dir`
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            ledger_file: default_ledger_file(),
        }
    }
}

impl OutputConfig {
    /// Full path of the ledger table
    pub fn ledger_path(&self) -> PathBuf {
        self.base_dir.join(&self.ledger_file)
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("Papers")
}

fn default_ledger_file() -> String {
    "paper_list.csv".to_string()
}

/// Search defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Keyword phrases offered when the prompt is left empty
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Default first month
    #[serde(default = "default_start")]
    pub start: YearMonth,

    /// Default last month
    #[serde(default = "default_end")]
    pub end: YearMonth,

    /// Default number of papers to download
    #[serde(default = "default_num_papers")]
    pub num_papers: usize,

    /// Drop results announced outside `[start, end]`
    #[serde(default)]
    pub enforce_date_range: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            start: default_start(),
            end: default_end(),
            num_papers: default_num_papers(),
            enforce_date_range: false,
        }
    }
}

fn default_keywords() -> Vec<String> {
    vec![
        "fairness".to_string(),
        "machine learning".to_string(),
        "synthetic data generation".to_string(),
    ]
}

fn default_start() -> YearMonth {
    YearMonth::new(2023, 1).unwrap_or_else(|_| YearMonth::current())
}

fn default_end() -> YearMonth {
    YearMonth::new(2023, 12).unwrap_or_else(|_| YearMonth::current())
}

fn default_num_papers() -> usize {
    5
}

/// HTTP fetch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// arXiv base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Wait after loading the results page, in milliseconds
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            settle_delay_ms: default_settle_delay(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    ARXIV_BASE_URL.to_string()
}

fn default_settle_delay() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.base_dir, PathBuf::from("Papers"));
        assert_eq!(
            config.output.ledger_path(),
            PathBuf::from("Papers").join("paper_list.csv")
        );
        assert_eq!(
            config.search.keywords,
            vec!["fairness", "machine learning", "synthetic data generation"]
        );
        assert_eq!(config.search.start.to_string(), "202301");
        assert_eq!(config.search.end.to_string(), "202312");
        assert_eq!(config.search.num_papers, 5);
        assert!(!config.search.enforce_date_range);
        assert_eq!(config.fetch.base_url, "https://arxiv.org");
        assert_eq!(config.fetch.settle_delay_ms, 2000);
        assert!(config.fetch.user_agent.starts_with("arxiv-crawler/"));
    }
}
