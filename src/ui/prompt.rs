//! Interactive collection of crawl parameters.

use std::io::{self, BufRead, Write};

use crate::config::SearchConfig;
use crate::models::{SearchQuery, YearMonth};

/// Reads crawl parameters line by line, falling back to defaults on empty input
///
/// End of input counts as an empty answer, so a closed stdin accepts every
/// default instead of looping.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and return the trimmed answer
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Comma-separated keyword phrases; surrounding quotes are stripped
    pub fn keywords(&mut self, defaults: &[String]) -> io::Result<Vec<String>> {
        let answer = self.ask(&format!(
            "Enter keywords to search for papers (comma-separated, e.g., {:?}): ",
            defaults
        ))?;

        let keywords = split_keywords(&answer);
        if keywords.is_empty() {
            Ok(defaults.to_vec())
        } else {
            Ok(keywords)
        }
    }

    /// A `YYYYMM` value, re-prompting until it parses
    pub fn year_month(&mut self, label: &str, default: YearMonth) -> io::Result<YearMonth> {
        loop {
            let answer = self.ask(&format!(
                "Enter {} year and month in YYYYMM format (default: {}): ",
                label, default
            ))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse() {
                Ok(ym) => return Ok(ym),
                Err(e) => writeln!(self.output, "Invalid input. {}", e)?,
            }
        }
    }

    /// Number of papers, re-prompting until it parses as a non-negative integer
    pub fn paper_count(&mut self, default: usize) -> io::Result<usize> {
        loop {
            let answer = self.ask(&format!(
                "Enter number of papers to download (default: {}): ",
                default
            ))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse() {
                Ok(n) => return Ok(n),
                Err(_) => writeln!(
                    self.output,
                    "Invalid input. Please enter a number for the number of papers."
                )?,
            }
        }
    }

    /// Ask for every crawl parameter in turn
    pub fn search_query(&mut self, defaults: &SearchConfig) -> io::Result<SearchQuery> {
        let keywords = self.keywords(&defaults.keywords)?;
        let start = self.year_month("start", defaults.start)?;
        let end = self.year_month("end", defaults.end)?;
        let count = self.paper_count(defaults.num_papers)?;

        Ok(SearchQuery::new(keywords, start).end(end).max_results(count))
    }
}

/// Split a comma-separated answer into trimmed, unquoted phrases
pub fn split_keywords(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(|k| k.trim().trim_matches('\'').trim_matches('"').trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(
            split_keywords(" 'fairness', \"machine learning\" ,graphs"),
            vec!["fairness", "machine learning", "graphs"]
        );
        assert!(split_keywords("").is_empty());
        assert!(split_keywords(" , ").is_empty());
    }

    #[test]
    fn test_defaults_on_empty_input() {
        let defaults = SearchConfig::default();
        let mut p = prompter("\n\n\n\n");
        let query = p.search_query(&defaults).unwrap();

        assert_eq!(query.keywords, defaults.keywords);
        assert_eq!(query.start.to_string(), "202301");
        assert_eq!(query.end.map(|e| e.to_string()), Some("202312".to_string()));
        assert_eq!(query.max_results, 5);
    }

    #[test]
    fn test_closed_input_takes_defaults() {
        let mut p = prompter("");
        let query = p.search_query(&SearchConfig::default()).unwrap();
        assert_eq!(query.max_results, 5);
    }

    #[test]
    fn test_count_reprompts_until_integer() {
        let mut p = prompter("five\n-\n7\n");
        assert_eq!(p.paper_count(5).unwrap(), 7);

        let output = String::from_utf8(p.output).unwrap();
        assert_eq!(
            output
                .matches("Invalid input. Please enter a number for the number of papers.")
                .count(),
            2
        );
    }

    #[test]
    fn test_negative_count_reprompts() {
        let mut p = prompter("-3\n0\n");
        assert_eq!(p.paper_count(5).unwrap(), 0);

        let output = String::from_utf8(p.output).unwrap();
        assert!(output.contains("Invalid input. Please enter a number for the number of papers."));
    }

    #[test]
    fn test_year_month_reprompts() {
        let mut p = prompter("2024-06\n202406\n");
        let ym = p.year_month("start", "202301".parse().unwrap()).unwrap();
        assert_eq!(ym.to_string(), "202406");
    }

    #[test]
    fn test_full_answers() {
        let mut p = prompter("graph neural networks, 'privacy'\n202401\n202406\n3\n");
        let query = p.search_query(&SearchConfig::default()).unwrap();

        assert_eq!(query.keywords, vec!["graph neural networks", "privacy"]);
        assert_eq!(query.start.to_string(), "202401");
        assert_eq!(query.end.unwrap().to_string(), "202406");
        assert_eq!(query.max_results, 3);
    }
}
