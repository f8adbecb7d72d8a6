//! Rule building blocks shared by the vendor grammars.

pub mod numbers;
pub mod patterns;

pub use numbers::{derive_unit_price, format_amount, parse_amount, parse_quantity};
pub use patterns::*;

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A labelled header field (PO number, customer) tried against an ordered
/// list of patterns. Each pattern must have a `value` capture group; the
/// first pattern that matches wins.
#[derive(Debug, Clone, Copy)]
pub struct LabeledField<'a> {
    patterns: &'a [&'a Regex],
}

impl<'a> LabeledField<'a> {
    pub fn new(patterns: &'a [&'a Regex]) -> Self {
        Self { patterns }
    }

    /// Extracted value, or the empty string.
    pub fn extract_or_empty(&self, text: &str) -> String {
        self.extract(text).unwrap_or_default()
    }
}

impl FieldExtractor for LabeledField<'_> {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.patterns.iter().find_map(|re| {
            re.captures(text)
                .and_then(|caps| caps.name("value"))
                .map(|m| m.as_str().trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }
}
