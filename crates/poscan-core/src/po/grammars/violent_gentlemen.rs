//! Violent Gentlemen purchase orders.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::{trimmed_lines, VendorGrammar};
use crate::models::po::{LineItem, Vendor};
use crate::po::rules::{parse_amount, parse_quantity, FieldExtractor, LabeledField};

const MARKER: &str = "Violent Gentlemen";
const OVERSIZE_SUFFIX: &str = "-OVERSIZE";

lazy_static! {
    static ref PO_NUMBER: Regex = Regex::new(
        r"Purchase\s+Order\s*#\s*:?\s*(?P<value>[A-Za-z0-9-]+)"
    ).unwrap();

    // <style name> <style code> <field> <field> <5-8 size columns> <qty> $<unit> $<total>
    static ref ITEM_LINE: Regex = Regex::new(
        r"^(?P<name>.+?)\s+(?P<code>[A-Z]{1,5}\d[A-Z0-9-]*)\s+(?P<field1>\S+)\s+(?P<field2>\S+)\s+(?:\d+\s+){5,8}(?P<qty>\d[\d,]*)\s+\$\s?(?P<price>\d[\d.,]*)\s+\$\s?(?P<total>\d[\d,]*(?:\.\d{2})?)"
    ).unwrap();

    // Second qty/price/total group trailing the standard one.
    static ref OVERSIZE_GROUP: Regex = Regex::new(
        r"(?P<qty>\d[\d,]*)\s+\$\s?(?P<price>\d[\d.,]*)\s+\$\s?(?P<total>\d[\d,]*(?:\.\d{2})?)"
    ).unwrap();
}

/// Size-run table, one style per line, with an optional oversize group.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViolentGentlemen;

impl VendorGrammar for ViolentGentlemen {
    fn vendor(&self) -> Vendor {
        Vendor::ViolentGentlemen
    }

    fn matches(&self, text: &str) -> bool {
        text.contains(MARKER)
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        let patterns = [&*PO_NUMBER];
        let po = LabeledField::new(&patterns).extract_or_empty(text);
        let customer = self.vendor().display_name();

        let mut items = Vec::new();
        for line in trimmed_lines(text) {
            let Some(caps) = ITEM_LINE.captures(line) else {
                continue;
            };
            trace!("Matched style line: {}", line);

            let style = caps["code"].to_string();
            let description = format!("{} {} {}", &caps["name"], &caps["field1"], &caps["field2"]);

            items.push(
                LineItem::new(customer, po.clone())
                    .with_product(style.clone(), description.clone())
                    .with_amounts(
                        parse_quantity(&caps["qty"]),
                        parse_amount(&caps["price"]),
                        parse_amount(&caps["total"]),
                    ),
            );

            let Some(end) = caps.get(0).map(|m| m.end()) else {
                continue;
            };
            if let Some(extra) = OVERSIZE_GROUP.captures(&line[end..]) {
                items.push(
                    LineItem::new(customer, po.clone())
                        .with_product(
                            format!("{}{}", style, OVERSIZE_SUFFIX),
                            format!("{}{}", description, OVERSIZE_SUFFIX),
                        )
                        .with_amounts(
                            parse_quantity(&extra["qty"]),
                            parse_amount(&extra["price"]),
                            parse_amount(&extra["total"]),
                        ),
                );
            }
        }

        debug!("Violent Gentlemen PO {:?}: {} items", po, items.len());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_standard_lines() {
        let text = "Violent Gentlemen\nPurchase Order# VG-1042\n\
                    Style Code Color Fit XS S M L XL Qty Price Total\n\
                    Reaper Tee VG2301 Black Regular 2 4 8 6 2 22 $12.00 $264.00\n\
                    Crest Hoodie VG2402 Navy Relaxed 0 10 20 30 20 10 90 $30.00 $2,700.00\n";
        let items = ViolentGentlemen.extract(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].po, "VG-1042");
        assert_eq!(items[0].style, "VG2301");
        assert_eq!(items[0].description, "Reaper Tee Black Regular");
        assert_eq!(items[0].qty, Some(22));
        assert_eq!(items[0].unit_price, Some(Decimal::new(1200, 2)));
        assert_eq!(items[0].total_amount, Some(Decimal::new(26400, 2)));

        assert_eq!(items[1].style, "VG2402");
        assert_eq!(items[1].qty, Some(90));
        assert_eq!(items[1].total_amount, Some(Decimal::new(270000, 2)));
    }

    #[test]
    fn test_oversize_group_emits_second_item() {
        let text = "Violent Gentlemen\nPurchase Order# 77\n\
                    Reaper Tee VG2301 Black Regular 2 4 8 6 2 22 $12.00 $264.00 2XL 3XL 2 2 4 $14.00 $56.00";
        let items = ViolentGentlemen.extract(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].style, "VG2301");
        assert_eq!(items[1].style, "VG2301-OVERSIZE");
        assert_eq!(items[1].description, "Reaper Tee Black Regular-OVERSIZE");
        assert_eq!(items[1].qty, Some(4));
        assert_eq!(items[1].unit_price, Some(Decimal::new(1400, 2)));
        assert_eq!(items[1].total_amount, Some(Decimal::new(5600, 2)));
    }

    #[test]
    fn test_lines_with_too_few_columns_are_skipped() {
        let text = "Violent Gentlemen\nReaper Tee VG2301 Black Regular 2 4 22 $12.00 $264.00";
        assert!(ViolentGentlemen.extract(text).is_empty());
    }
}
