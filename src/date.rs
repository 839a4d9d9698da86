// Date filter entered by the user at the date prompt. Only the shape is
// checked; whether the rover has photos on that day is up to the API.

use crate::error::InputError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Four digits, dash, two digits, dash, two digits. ASCII digits only.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));

/// Returns whether `text` follows the `YYYY-MM-DD` grammar.
#[must_use]
pub fn is_valid_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

/// A syntactically valid `YYYY-MM-DD` date used to filter a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter(String);

impl DateFilter {
    /// Parse user text into a filter.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidDate` when `text` does not match the
    /// grammar. No calendar check is made, so `2023-13-99` is accepted.
    pub fn parse(text: &str) -> Result<Self, InputError> {
        if is_valid_date(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(InputError::InvalidDate(text.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DateFilter {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_four_two_two_digits() {
        assert!(is_valid_date("2023-01-10"));
        assert!(is_valid_date("0000-00-00"));
    }

    #[test]
    fn test_no_calendar_validation() {
        assert!(is_valid_date("2023-13-99"));
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        assert!(!is_valid_date("2023-1-10"));
        assert!(!is_valid_date("23-01-10"));
        assert!(!is_valid_date("2023-01-100"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn test_rejects_missing_separators() {
        assert!(!is_valid_date("20230110"));
        assert!(!is_valid_date("2023/01/10"));
        assert!(!is_valid_date("2023-0110"));
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(!is_valid_date("2023-0a-10"));
        assert!(!is_valid_date("yyyy-mm-dd"));
        // Arabic-Indic digits are digits to Unicode, not to this grammar
        assert!(!is_valid_date("٢٠٢٣-01-10"));
    }

    #[test]
    fn test_rejects_surrounding_text() {
        assert!(!is_valid_date(" 2023-01-10"));
        assert!(!is_valid_date("2023-01-10\n"));
        assert!(!is_valid_date("on 2023-01-10"));
    }

    #[test]
    fn test_parse_keeps_text() {
        let date: DateFilter = "2023-01-10".parse().unwrap();
        assert_eq!(date.as_str(), "2023-01-10");
        assert_eq!(date.to_string(), "2023-01-10");
    }

    #[test]
    fn test_parse_error_carries_input() {
        let err = DateFilter::parse("tomorrow").unwrap_err();
        assert_eq!(err, InputError::InvalidDate("tomorrow".to_string()));
    }
}
