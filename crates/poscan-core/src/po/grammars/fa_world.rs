//! FA World Entertainment purchase orders.
//!
//! The orders list a fixed pair of products. Each block is the product name,
//! its color line carrying the block quantity and total, then a size
//! breakdown. The `Xs` row of the breakdown carries the unit price; when it is
//! missing the unit price is derived from the block total.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::VendorGrammar;
use crate::models::po::{LineItem, Vendor};
use crate::po::rules::{
    derive_unit_price, parse_amount, parse_quantity, FieldExtractor, LabeledField,
};

const MARKER: &str = "FA World Entertainment";

lazy_static! {
    static ref PO_NUMBER: Regex = Regex::new(
        r"\bPO\s*(?:#|No\.?|Number)?\s*:?\s*(?P<value>[A-Z0-9-]*\d[A-Z0-9-]*)"
    ).unwrap();

    static ref OVERSHIRT_BLOCK: Regex = Regex::new(
        r"Pile\s+Fleece\s+Overshirt\s+Black\s*-\s*Black\s+(?P<qty>\d[\d,]*)\s+\$?\s?(?P<total>\d[\d.,]*)"
    ).unwrap();

    static ref LOUNGE_PANTS_BLOCK: Regex = Regex::new(
        r"Corduroy\s+Lounge\s+Pants\s*-\s*Fall\s+25\s+Brown\s*-\s*Brown\s+(?P<qty>\d[\d,]*)\s+\$?\s?(?P<total>\d[\d.,]*)"
    ).unwrap();

    // Start of any product block; bounds the previous block's size breakdown.
    static ref BLOCK_START: Regex = Regex::new(
        r"Pile\s+Fleece\s+Overshirt|Corduroy\s+Lounge\s+Pants"
    ).unwrap();

    static ref XS_PRICE: Regex = Regex::new(
        r"\bXs\s+\d[\d,]*\s+\$?\s?(?P<price>\d[\d.,]*)"
    ).unwrap();
}

struct Product {
    name: &'static str,
    color: &'static str,
    block: &'static Regex,
}

/// Fixed product pair sold by FA World.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaWorld;

impl FaWorld {
    fn products() -> [Product; 2] {
        [
            Product {
                name: "Pile Fleece Overshirt",
                color: "Black - Black",
                block: &OVERSHIRT_BLOCK,
            },
            Product {
                name: "Corduroy Lounge Pants - Fall 25",
                color: "Brown - Brown",
                block: &LOUNGE_PANTS_BLOCK,
            },
        ]
    }

    fn extract_block(&self, text: &str, product: &Product, po: &str) -> Option<LineItem> {
        let caps = product.block.captures(text)?;
        let end = caps.get(0)?.end();

        let rest = &text[end..];
        let body = match BLOCK_START.find(rest) {
            Some(next) => &rest[..next.start()],
            None => rest,
        };

        let qty = parse_quantity(&caps["qty"]);
        let total = parse_amount(&caps["total"]);
        let unit_price = match XS_PRICE.captures(body) {
            Some(xs) => parse_amount(&xs["price"]),
            None => {
                trace!("No Xs row for {}, deriving unit price", product.name);
                derive_unit_price(total, qty)
            }
        };

        Some(
            LineItem::new(self.vendor().display_name(), po)
                .with_product(product.name, product.color)
                .with_amounts(qty, unit_price, total),
        )
    }
}

impl VendorGrammar for FaWorld {
    fn vendor(&self) -> Vendor {
        Vendor::FaWorld
    }

    fn matches(&self, text: &str) -> bool {
        text.contains(MARKER)
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        let patterns = [&*PO_NUMBER];
        let po = LabeledField::new(&patterns).extract_or_empty(text);

        let items: Vec<LineItem> = Self::products()
            .iter()
            .filter_map(|product| self.extract_block(text, product, &po))
            .collect();

        debug!("FA World PO {:?}: {} items", po, items.len());
        items
    }
}
