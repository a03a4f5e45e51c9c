//! Month tables and the helpers that order and display events by date.
//!
//! The published calendar only ever stores a month name and a free-form
//! date string, so every ordering decision is made from those two values.

use regex::Regex;
use std::sync::OnceLock;

pub const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const FULL_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `(month, day)` pair used to order events within a year.
pub type SortKey = (u32, u32);

pub fn is_short_month(token: &str) -> bool {
    SHORT_MONTHS.contains(&token)
}

/// Expand a three-letter abbreviation to the full month name.
/// Anything else is returned unchanged.
pub fn expand_month(token: &str) -> &str {
    SHORT_MONTHS
        .iter()
        .position(|m| *m == token)
        .map(|i| FULL_MONTHS[i])
        .unwrap_or(token)
}

/// 1-based month number for a full name (`"March"`) or abbreviation (`"Mar"`).
pub fn month_number(name: &str) -> Option<u32> {
    FULL_MONTHS
        .iter()
        .position(|m| *m == name)
        .or_else(|| SHORT_MONTHS.iter().position(|m| *m == name))
        .map(|i| i as u32 + 1)
}

/// First run of digits in a date string such as `"March 14"`.
pub fn first_day_number(date: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern compiles"));
    re.find(date).and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Sort key for a published row. Unknown months sort as January, missing days as the 1st.
pub fn row_sort_key(month: &str, date: &str) -> SortKey {
    (
        month_number(month).unwrap_or(1),
        first_day_number(date).unwrap_or(1),
    )
}

/// Blanks the month of a row when it repeats the month of the row before it.
#[derive(Debug, Default)]
pub struct MonthRunEncoder {
    current: Option<String>,
}

impl MonthRunEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value to put in the Month column for a row belonging to `month`.
    pub fn display(&mut self, month: &str) -> String {
        if month.is_empty() || self.current.as_deref() == Some(month) {
            return String::new();
        }
        self.current = Some(month.to_string());
        month.to_string()
    }
}

/// Inverse of [`MonthRunEncoder`]: fills blank months from the last seen one.
#[derive(Debug, Default)]
pub struct MonthRunDecoder {
    current: String,
}

impl MonthRunDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, month: &str) -> String {
        if !month.is_empty() {
            self.current = month.to_string();
        }
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_abbreviations_only() {
        assert_eq!(expand_month("Mar"), "March");
        assert_eq!(expand_month("Sep"), "September");
        assert_eq!(expand_month("Sept"), "Sept");
        assert_eq!(expand_month("March"), "March");
    }

    #[test]
    fn month_numbers_accept_both_forms() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("Dec"), Some(12));
        assert_eq!(month_number("june"), None);
    }

    #[test]
    fn row_sort_key_defaults() {
        assert_eq!(row_sort_key("February", "February 14"), (2, 14));
        assert_eq!(row_sort_key("", "TBD"), (1, 1));
        assert_eq!(row_sort_key("Smarch", "the 3rd"), (1, 3));
    }

    #[test]
    fn encoder_blanks_repeated_months() {
        let mut enc = MonthRunEncoder::new();
        let shown: Vec<String> = ["January", "February", "February", "", "March"]
            .iter()
            .map(|m| enc.display(m))
            .collect();
        assert_eq!(shown, vec!["January", "February", "", "", "March"]);
    }

    #[test]
    fn decoder_inherits_previous_month() {
        let mut dec = MonthRunDecoder::new();
        assert_eq!(dec.resolve(""), "");
        assert_eq!(dec.resolve("April"), "April");
        assert_eq!(dec.resolve(""), "April");
        assert_eq!(dec.resolve("May"), "May");
    }
}
