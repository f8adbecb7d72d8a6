//! Purchase-order line item models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line item extracted from a purchase order.
///
/// Numeric fields are `None` when the OCR token could not be parsed. Such an
/// item is still emitted so that downstream consumers see the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Customer (or vendor) the order belongs to.
    pub customer: String,

    /// Purchase order number printed on the document.
    pub po: String,

    /// Style code or product name.
    pub style: String,

    /// Free-text product description.
    pub description: String,

    /// Ordered quantity.
    pub qty: Option<u64>,

    /// Price per unit.
    pub unit_price: Option<Decimal>,

    /// Line total.
    pub total_amount: Option<Decimal>,
}

impl LineItem {
    /// Create an item with the header fields set and no numbers.
    pub fn new(customer: impl Into<String>, po: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            po: po.into(),
            ..Self::default()
        }
    }

    /// Set style and description.
    pub fn with_product(
        mut self,
        style: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.style = style.into();
        self.description = description.into();
        self
    }

    /// Set quantity, unit price and total.
    pub fn with_amounts(
        mut self,
        qty: Option<u64>,
        unit_price: Option<Decimal>,
        total_amount: Option<Decimal>,
    ) -> Self {
        self.qty = qty;
        self.unit_price = unit_price;
        self.total_amount = total_amount;
        self
    }

    /// Whether every numeric field holds a usable value.
    pub fn has_numbers(&self) -> bool {
        self.qty.is_some() && self.unit_price.is_some() && self.total_amount.is_some()
    }

    /// Check that `qty * unit_price` is within one cent of the total.
    ///
    /// Returns `None` if any of the numbers is missing or the product does
    /// not fit in a `Decimal`.
    pub fn is_consistent(&self) -> Option<bool> {
        let expected = Decimal::from(self.qty?).checked_mul(self.unit_price?)?;
        let diff = expected.checked_sub(self.total_amount?)?;
        Some(diff.abs() <= Decimal::new(1, 2))
    }
}

/// Vendor layouts the parser knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// Ripple Junction (Godzilla apparel orders).
    RippleJunction,
    /// FA World Entertainment.
    FaWorld,
    /// Violent Gentlemen.
    ViolentGentlemen,
    /// Baker Boys Distribution.
    BakerBoys,
    /// Any other layout, parsed with loose label/amount rules.
    Generic,
    /// Blank document; nothing to parse.
    Empty,
}

impl Vendor {
    /// Name written into the customer column.
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::RippleJunction => "Ripple Junction",
            Vendor::FaWorld => "FA World Entertainment",
            Vendor::ViolentGentlemen => "Violent Gentlemen",
            Vendor::BakerBoys => "Baker Boys Distribution",
            Vendor::Generic => "Generic",
            Vendor::Empty => "Empty",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
