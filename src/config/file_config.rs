//! Configuration file support for arxiv-crawler.
//!
//! Settings are read from a TOML file and may be overridden by environment
//! variables prefixed with `ARXIV_CRAWLER_`, using `__` between section and
//! key (e.g. `ARXIV_CRAWLER_OUTPUT__BASE_DIR=/data/papers`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [output]
//! base_dir = "Papers"
//! ledger_file = "paper_list.csv"
//!
//! [search]
//! keywords = ["fairness", "machine learning", "synthetic data generation"]
//! start = "202301"
//! end = "202312"
//! num_papers = 5
//! enforce_date_range = false
//!
//! [fetch]
//! base_url = "https://arxiv.org"
//! settle_delay_ms = 2000
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "arxiv-crawler.toml";

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "ARXIV_CRAWLER";

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Load configuration from a file, with environment overrides applied
pub fn load_config(path: &Path) -> Result<Config, ConfigFileError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Find a configuration file in the default locations
///
/// Checks `./arxiv-crawler.toml`, then `<config dir>/arxiv-crawler/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-crawler").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content = to_toml(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Render configuration as TOML
pub fn to_toml(config: &Config) -> Result<String, ConfigFileError> {
    toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
}
