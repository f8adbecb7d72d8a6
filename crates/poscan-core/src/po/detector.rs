//! Vendor detection.
//!
//! Grammars are tried in a fixed priority order and the first one whose
//! marker appears in the text wins. Corrupted OCR output can carry more than
//! one vendor marker, so the order of [`GRAMMARS`] must not change.

use tracing::debug;

use super::grammars::{
    BakerBoys, EmptyGrammar, FaWorld, Generic, RippleJunction, VendorGrammar, ViolentGentlemen,
};
use crate::models::po::Vendor;

/// Grammars in priority order. [`Generic`] matches everything and must stay last.
static GRAMMARS: [&dyn VendorGrammar; 5] = [
    &RippleJunction,
    &FaWorld,
    &ViolentGentlemen,
    &BakerBoys,
    &Generic,
];

static EMPTY: EmptyGrammar = EmptyGrammar;

/// Select the grammar for a document.
pub fn detect(text: &str) -> &'static dyn VendorGrammar {
    if text.trim().is_empty() {
        debug!("Blank document, nothing to parse");
        return &EMPTY;
    }

    let grammar = GRAMMARS
        .iter()
        .copied()
        .find(|g| g.matches(text))
        .unwrap_or(&Generic);

    debug!("Detected vendor: {}", grammar.vendor());
    grammar
}

/// The vendor [`detect`] would route the text to.
pub fn detect_vendor(text: &str) -> Vendor {
    detect(text).vendor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_text() {
        assert_eq!(detect_vendor(""), Vendor::Empty);
        assert_eq!(detect_vendor(" \n\t "), Vendor::Empty);
    }

    #[test]
    fn test_each_marker() {
        assert_eq!(detect_vendor("RIPPLE JUNCTION order"), Vendor::RippleJunction);
        assert_eq!(detect_vendor("style ZQBQ12"), Vendor::RippleJunction);
        assert_eq!(detect_vendor("FA World Entertainment"), Vendor::FaWorld);
        assert_eq!(detect_vendor("Violent Gentlemen"), Vendor::ViolentGentlemen);
        assert_eq!(detect_vendor("Baker Boys Distribution"), Vendor::BakerBoys);
        assert_eq!(detect_vendor("Some other supplier"), Vendor::Generic);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            detect_vendor("Baker Boys Distribution\nZQBQ99A"),
            Vendor::RippleJunction
        );
        assert_eq!(
            detect_vendor("Violent Gentlemen via FA World Entertainment"),
            Vendor::FaWorld
        );
        assert_eq!(
            detect_vendor("Baker Boys Distribution / Violent Gentlemen"),
            Vendor::ViolentGentlemen
        );
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(detect_vendor("ripple junction"), Vendor::Generic);
    }
}
