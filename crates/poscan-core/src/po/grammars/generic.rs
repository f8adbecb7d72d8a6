//! Fallback grammar for unknown layouts.
//!
//! Matching is deliberately loose: the first digit run after the style token
//! is taken as the quantity, so a date or SKU digit run in front of the real
//! quantity will be picked up instead.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::VendorGrammar;
use crate::models::po::{LineItem, Vendor};
use crate::po::rules::{
    parse_amount, parse_quantity, squash_whitespace, FieldExtractor, LabeledField, DIGIT_RUN,
    DOLLAR_AMOUNT,
};

const UNKNOWN_CUSTOMER: &str = "Unknown";

lazy_static! {
    static ref CUSTOMER_LABEL: Regex = Regex::new(r"(?i)Customer:\s*(?P<value>[^\n]+)").unwrap();
    static ref SOLD_TO_LABEL: Regex = Regex::new(r"(?i)SOLD TO:\s*(?P<value>[^\n]+)").unwrap();
    static ref BILL_TO_LABEL: Regex = Regex::new(r"(?i)BILL TO:\s*(?P<value>[^\n]+)").unwrap();

    static ref PO_LABEL: Regex = Regex::new(
        r"(?i)(?:\bP\.O\.|\bPO\b)\s*(?:#|Number|No\.?)?\s*:?\s*(?P<value>[A-Z0-9-]*\d[A-Z0-9-]*)"
    ).unwrap();
    static ref PURCHASE_ORDER_LABEL: Regex = Regex::new(
        r"(?i)Purchase\s+Order\s*(?:#|Number|No\.?)?\s*:?\s*(?P<value>[A-Z0-9-]*\d[A-Z0-9-]*)"
    ).unwrap();

    // <style> ... <qty> ... $<unit> ... $<total>
    static ref ITEM_LINE: Regex = Regex::new(
        r"^\s*(?P<style>[A-Za-z0-9][A-Za-z0-9-]*)\b.*?(?P<qty>\d+).*?\$\s?(?P<price>\d[\d,]*(?:\.\d+)?).*?\$\s?(?P<total>\d[\d,]*(?:\.\d+)?)"
    ).unwrap();
}

/// Always-matching fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Generic {
    fn customer(text: &str) -> String {
        let patterns = [&*CUSTOMER_LABEL, &*SOLD_TO_LABEL, &*BILL_TO_LABEL];
        LabeledField::new(&patterns)
            .extract(text)
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string())
    }

    fn po_number(text: &str) -> String {
        let patterns = [&*PO_LABEL, &*PURCHASE_ORDER_LABEL];
        LabeledField::new(&patterns).extract_or_empty(text)
    }

    /// The line with its style token, first digit run and dollar amounts removed.
    fn synthesize_description(line: &str, style: &str) -> String {
        let without_style = line.replacen(style, "", 1);
        let without_qty = DIGIT_RUN.replace(&without_style, "");
        let without_amounts = DOLLAR_AMOUNT.replace_all(&without_qty, "");
        squash_whitespace(&without_amounts)
    }
}

impl VendorGrammar for Generic {
    fn vendor(&self) -> Vendor {
        Vendor::Generic
    }

    fn matches(&self, _text: &str) -> bool {
        true
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        let customer = Self::customer(text);
        let po = Self::po_number(text);
        let lines: Vec<&str> = text.lines().collect();

        let mut items = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let Some(caps) = ITEM_LINE.captures(line) else {
                continue;
            };
            trace!("Generic line match: {}", line);

            let style = &caps["style"];
            let description = match lines.get(i + 1) {
                Some(next) if !next.trim().is_empty() && !next.contains('$') => {
                    next.trim().to_string()
                }
                _ => Self::synthesize_description(line, style),
            };

            items.push(
                LineItem::new(customer.clone(), po.clone())
                    .with_product(style, description)
                    .with_amounts(
                        parse_quantity(&caps["qty"]),
                        parse_amount(&caps["price"]),
                        parse_amount(&caps["total"]),
                    ),
            );
        }

        debug!("Generic PO {:?} for {:?}: {} items", po, customer, items.len());
        items
    }
}
