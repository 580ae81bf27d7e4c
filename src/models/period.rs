//! `YYYYMM` period identifiers.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Full English month names, in calendar order
const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Errors produced when building a [`YearMonth`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum YearMonthError {
    /// Not six ASCII digits, or month outside 01..=12
    #[error("Invalid year-month '{0}', expected YYYYMM")]
    InvalidFormat(String),

    /// Month name not found in the month table
    #[error("Unknown month name '{0}'")]
    UnknownMonth(String),
}

/// A calendar month, rendered as `YYYYMM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Create from numeric parts
    pub fn new(year: u16, month: u8) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) || year > 9999 {
            return Err(YearMonthError::InvalidFormat(format!(
                "{:04}{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// The current local month
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: now.year() as u16,
            month: now.month() as u8,
        }
    }

    /// Convert human-readable "Month YYYY" text, e.g. `"June 2024"` → `202406`
    ///
    /// Month names are matched case-insensitively against full English names.
    pub fn from_month_year(text: &str) -> Result<Self, YearMonthError> {
        let mut parts = text.split_whitespace();
        let (Some(name), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(YearMonthError::InvalidFormat(text.to_string()));
        };

        let lowered = name.to_lowercase();
        let month = MONTH_NAMES
            .iter()
            .position(|m| *m == lowered)
            .ok_or_else(|| YearMonthError::UnknownMonth(name.to_string()))?;

        let year = year
            .parse::<u16>()
            .map_err(|_| YearMonthError::InvalidFormat(text.to_string()))?;

        Self::new(year, month as u8 + 1)
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(YearMonthError::InvalidFormat(s.to_string()));
        }
        let year = s[..4]
            .parse()
            .map_err(|_| YearMonthError::InvalidFormat(s.to_string()))?;
        let month = s[4..]
            .parse()
            .map_err(|_| YearMonthError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_month_year() {
        assert_eq!(
            YearMonth::from_month_year("June 2024").unwrap().to_string(),
            "202406"
        );
        assert_eq!(
            YearMonth::from_month_year("January 2023").unwrap().to_string(),
            "202301"
        );
        assert_eq!(
            YearMonth::from_month_year("december 1999").unwrap().to_string(),
            "199912"
        );
    }

    #[test]
    fn test_from_month_year_unknown_month() {
        assert_eq!(
            YearMonth::from_month_year("Smarch 2024"),
            Err(YearMonthError::UnknownMonth("Smarch".to_string()))
        );
        // Abbreviations are not part of the table
        assert!(matches!(
            YearMonth::from_month_year("Jun 2024"),
            Err(YearMonthError::UnknownMonth(_))
        ));
    }

    #[test]
    fn test_parse_yyyymm() {
        let ym: YearMonth = "202301".parse().unwrap();
        assert_eq!(ym.year(), 2023);
        assert_eq!(ym.month(), 1);
        assert_eq!(ym.to_string(), "202301");

        assert!("202313".parse::<YearMonth>().is_err());
        assert!("202300".parse::<YearMonth>().is_err());
        assert!("2023-01".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_ordering() {
        let start: YearMonth = "202301".parse().unwrap();
        let end: YearMonth = "202312".parse().unwrap();
        let next_year: YearMonth = "202401".parse().unwrap();
        assert!(start < end);
        assert!(end < next_year);
    }

    #[test]
    fn test_current_is_valid() {
        let now = YearMonth::current();
        assert!((1..=12).contains(&now.month()));
        assert_eq!(now.to_string().len(), 6);
    }
}
