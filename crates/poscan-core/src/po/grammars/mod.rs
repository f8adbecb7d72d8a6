//! Vendor-specific grammars.
//!
//! Each vendor's layout lives in its own module with its own literals so a
//! fix for one vendor cannot change what another one extracts.

mod baker_boys;
mod fa_world;
mod generic;
mod ripple_junction;
mod violent_gentlemen;

pub use baker_boys::BakerBoys;
pub use fa_world::FaWorld;
pub use generic::Generic;
pub use ripple_junction::RippleJunction;
pub use violent_gentlemen::ViolentGentlemen;

use crate::models::po::{LineItem, Vendor};

/// Detection rule plus extraction logic for one document layout.
pub trait VendorGrammar: Send + Sync {
    /// The vendor this grammar handles.
    fn vendor(&self) -> Vendor;

    /// Whether the text carries this vendor's marker.
    fn matches(&self, text: &str) -> bool;

    /// Extract line items in document order.
    fn extract(&self, text: &str) -> Vec<LineItem>;
}

/// Grammar used for blank documents; never produces items.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyGrammar;

impl VendorGrammar for EmptyGrammar {
    fn vendor(&self) -> Vendor {
        Vendor::Empty
    }

    fn matches(&self, text: &str) -> bool {
        text.trim().is_empty()
    }

    fn extract(&self, _text: &str) -> Vec<LineItem> {
        Vec::new()
    }
}

/// Non-empty lines with surrounding whitespace removed.
pub(crate) fn trimmed_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}
