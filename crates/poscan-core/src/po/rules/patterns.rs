//! Regex patterns shared by several vendor grammars.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dollar amount anywhere on a line ($12.50, $ 1,234.00)
    pub static ref DOLLAR_AMOUNT: Regex = Regex::new(
        r"\$\s?\d[\d,]*(?:\.\d+)?"
    ).unwrap();

    // First run of digits
    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse internal whitespace runs to a single space and trim.
pub fn squash_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}
