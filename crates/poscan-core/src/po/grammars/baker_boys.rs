//! Baker Boys Distribution purchase orders.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{trimmed_lines, VendorGrammar};
use crate::models::po::{LineItem, Vendor};
use crate::po::rules::{
    parse_amount, parse_quantity, squash_whitespace, FieldExtractor, LabeledField,
};

const MARKER: &str = "Baker Boys Distribution";
const WAREHOUSE_LABEL: &str = "Whse:";

lazy_static! {
    static ref PO_NUMBER: Regex = Regex::new(
        r"P\.O\.\s*Number:\s*(?P<value>[A-Za-z0-9-]+)"
    ).unwrap();

    // <item code> EACH <qty> <ignored> <ignored> <unit> <total> <description>
    static ref ITEM_LINE: Regex = Regex::new(
        r"^(?P<code>\d[\d-]*)\s+EACH\s+(?P<qty>\d[\d,]*)\s+[\d.,]+\s+[\d.,]+\s+(?P<price>\d[\d.,]*)\s+(?P<total>\d[\d,]*(?:\.\d{2})?)\s*(?P<desc>.*)$"
    ).unwrap();
}

/// Description text up to the warehouse marker.
fn strip_warehouse(desc: &str) -> String {
    let head = desc.split(WAREHOUSE_LABEL).next().unwrap_or_default();
    squash_whitespace(head)
}

/// Distributor invoice-style table with an item code per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct BakerBoys;

impl VendorGrammar for BakerBoys {
    fn vendor(&self) -> Vendor {
        Vendor::BakerBoys
    }

    fn matches(&self, text: &str) -> bool {
        text.contains(MARKER)
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        let patterns = [&*PO_NUMBER];
        let po = LabeledField::new(&patterns).extract_or_empty(text);

        let items: Vec<LineItem> = trimmed_lines(text)
            .filter_map(|line| ITEM_LINE.captures(line))
            .map(|caps| {
                LineItem::new(self.vendor().display_name(), po.clone())
                    .with_product(&caps["code"], strip_warehouse(&caps["desc"]))
                    .with_amounts(
                        parse_quantity(&caps["qty"]),
                        parse_amount(&caps["price"]),
                        parse_amount(&caps["total"]),
                    )
            })
            .collect();

        debug!("Baker Boys PO {:?}: {} items", po, items.len());
        items
    }
}
