//! Terminal output and interactive prompting.
//!
//! This module provides colored status lines, the run banners and the
//! [`Prompter`] that collects crawl parameters from stdin.

mod prompt;

pub use prompt::Prompter;

use owo_colors::OwoColorize;

use crate::crawler::{CrawlSummary, DownloadOutcome};
use crate::models::PaperRecord;

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Error => "✗",
        Status::Info => "ℹ",
        Status::Download => "↓",
        Status::Skip => "○",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Error,
    Info,
    Download,
    Skip,
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Download => println!("{} {}", icon.magenta(), msg),
        Status::Skip => println!("{} {}", icon.white().dimmed(), msg),
    }
}

/// Print a horizontal rule, optionally with a centered label.
pub fn print_divider(label: Option<&str>) {
    match label {
        Some(label) => println!("{} {} {}", "-".repeat(25), label, "-".repeat(25)),
        None => println!("{}", "-".repeat(50)),
    }
}

/// Print the banner shown before a crawl starts.
pub fn print_run_header(today: &str, start: &str, end: &str) {
    print_divider(None);
    println!(
        "[{}] Crawling papers from arXiv from {} to {}",
        today.bold(),
        start,
        end
    );
    print_divider(None);
}

/// Progress line for one record.
pub fn outcome_line(title: &str, year_month: &str, outcome: &DownloadOutcome) -> String {
    match outcome {
        DownloadOutcome::Downloaded { .. } => format!("Downloaded: {} {}", year_month, title),
        DownloadOutcome::AlreadyPresent { .. } => format!("Already downloaded: {}", title),
    }
}

/// Print the progress line for one handled record.
pub fn print_outcome(record: &PaperRecord, outcome: &DownloadOutcome) {
    let line = outcome_line(
        &record.sanitized_title(),
        &record.year_month.to_string(),
        outcome,
    );
    match outcome {
        DownloadOutcome::Downloaded { bytes, .. } => print_status(
            Status::Download,
            &format!("{} ({})", line, format_file_size(*bytes as u64)),
        ),
        DownloadOutcome::AlreadyPresent { .. } => print_status(Status::Skip, &line),
    }
}

/// Print the closing lines of a run.
pub fn print_summary(summary: &CrawlSummary) {
    if summary.records.is_empty() {
        print_status(Status::Info, "No new papers found");
    } else {
        print_status(
            Status::Info,
            &format!(
                "{} new papers, {} downloaded to {}",
                summary.records.len(),
                summary.downloaded(),
                summary.download_dir.display()
            ),
        );
    }
    print_divider(Some("Done"));
}

/// Get a human-readable file size.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
