// src/parse/amount.rs
//
// Lenient number readers for hand-edited spreadsheet cells.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("leading float pattern should compile")
});

/// Read a currency cell such as `"$1,200.50"`.
///
/// `$` and `,` are stripped, then the longest numeric prefix is parsed, so
/// `"1200 (est)"` reads as 1200. Anything unreadable is 0.
pub fn parse_currency(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    LEADING_FLOAT
        .find(cleaned.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Read a head count: every non-digit is discarded and the rest parsed.
/// Empty or overflowing input is 0.
pub fn parse_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Drop trailing `:`, `-` and em dash characters from a label, then trim.
pub fn clean_label(raw: &str) -> &str {
    raw.trim_end_matches(&[':', '-', '\u{2014}'][..]).trim()
}
