//! Purchase-order text parsing.

pub mod detector;
pub mod grammars;
mod parser;
pub mod rules;

pub use detector::{detect, detect_vendor};
pub use grammars::VendorGrammar;
pub use parser::{parse, ExtractionResult, PurchaseOrderParser, RuleBasedParser};
