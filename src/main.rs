use anyhow::{Context, Result};
use arxiv_crawler::config::{find_config_file, get_config, load_config, save_config, to_toml};
use arxiv_crawler::ui::{self, Prompter, Status};
use arxiv_crawler::crawler::DownloadOutcome;
use arxiv_crawler::{ArxivFetcher, Crawler, PaperRecord};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv crawler - download new papers matching keyword phrases
#[derive(Parser, Debug)]
#[command(name = "arxiv-crawler")]
#[command(version = arxiv_crawler::VERSION)]
#[command(about = "Download new arXiv papers matching keyword phrases", long_about = None)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON instead of progress lines
    #[arg(long)]
    json: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to a TOML file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_crawler={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    if cli.print_config {
        print!("{}", to_toml(&config)?);
        return Ok(());
    }

    if let Some(path) = &cli.write_config {
        save_config(&config, path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        ui::print_status(Status::Info, &format!("Wrote {}", path.display()));
        return Ok(());
    }

    let query = Prompter::stdio()
        .search_query(&config.search)
        .context("Failed to read crawl parameters")?;

    let fetcher = ArxivFetcher::from_config(&config.fetch)?;
    let crawler = Crawler::new(fetcher, &config)?;

    let today = chrono::Local::now().format("%Y%m%d").to_string();
    if !cli.json {
        ui::print_run_header(
            &today,
            &query.start.to_string(),
            &query.resolved_end().to_string(),
        );
    }

    let progress = |record: &PaperRecord, outcome: &DownloadOutcome| {
        if !cli.json {
            ui::print_outcome(record, outcome);
        }
    };

    match crawler.run(&query, progress).await {
        Ok(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                ui::print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            ui::print_status(Status::Error, &format!("Crawl failed: {}", e));
            Err(e.into())
        }
    }
}
