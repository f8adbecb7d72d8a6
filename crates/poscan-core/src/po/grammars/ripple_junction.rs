//! Ripple Junction purchase orders.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::VendorGrammar;
use crate::models::po::{LineItem, Vendor};
use crate::po::rules::{parse_amount, parse_quantity, FieldExtractor, LabeledField};

const MARKERS: [&str; 2] = ["RIPPLE JUNCTION", "ZQBQ"];
const DESCRIPTION: &str = "GODZILLA CLASSIC KING OF MINI";

lazy_static! {
    static ref PO_NUMBER: Regex = Regex::new(r"(?P<value>\d{6})\s+REVISION").unwrap();

    // <style> <color code> BLACK <size> GODZILLA CLASSIC KING OF MINI <qty> <unit> <total>
    static ref ITEM_LINE: Regex = Regex::new(
        r"(?P<lead>\S+)\s+\d+\s+BLACK\s+\S+\s+GODZILLA[\s\-]+CLASSIC[\s\-]+KING[\s\-]+OF[\s\-]+MINI\s+(?P<qty>\d[\d,]*)\s+(?P<price>\d[\d.,]*)\s+(?P<total>\d[\d.,]*)"
    ).unwrap();

    static ref STYLE_CODE: Regex = Regex::new(r"ZQBQ[0-9A-Z]*").unwrap();
}

/// Single style family (Godzilla mini tee) listed per size row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RippleJunction;

impl VendorGrammar for RippleJunction {
    fn vendor(&self) -> Vendor {
        Vendor::RippleJunction
    }

    fn matches(&self, text: &str) -> bool {
        MARKERS.iter().any(|m| text.contains(m))
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        let patterns = [&*PO_NUMBER];
        let po = LabeledField::new(&patterns).extract_or_empty(text);

        let mut items = Vec::new();
        for caps in ITEM_LINE.captures_iter(text) {
            let Some(style) = STYLE_CODE.find(&caps["lead"]) else {
                trace!("Skipping row without style code: {}", &caps[0]);
                continue;
            };

            items.push(
                LineItem::new(self.vendor().display_name(), po.clone())
                    .with_product(style.as_str(), DESCRIPTION)
                    .with_amounts(
                        parse_quantity(&caps["qty"]),
                        parse_amount(&caps["price"]),
                        parse_amount(&caps["total"]),
                    ),
            );
        }

        debug!("Ripple Junction PO {:?}: {} items", po, items.len());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_single_row() {
        let text = "123456 REVISION ... ZQBQ99A 001 BLACK 5 GODZILLA-CLASSIC-KING-OF-MINI 10 12.50 125.00";
        let items = RippleJunction.extract(text);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.po, "123456");
        assert_eq!(item.style, "ZQBQ99A");
        assert_eq!(item.description, DESCRIPTION);
        assert_eq!(item.customer, "Ripple Junction");
        assert_eq!(item.qty, Some(10));
        assert_eq!(item.unit_price, Some(Decimal::new(1250, 2)));
        assert_eq!(item.total_amount, Some(Decimal::new(12500, 2)));
    }

    #[test]
    fn test_repeated_rows_across_wrapped_lines() {
        let text = "RIPPLE JUNCTION\nPO 654321 REVISION 2\n\
                    ZQBQ10S 001 BLACK S GODZILLA CLASSIC\nKING OF MINI 12 8.00 96.00\n\
                    ZQBQ10M 001 BLACK M GODZILLA CLASSIC KING OF MINI 1,200 8.00 9,600.00\n";
        let items = RippleJunction.extract(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].style, "ZQBQ10S");
        assert_eq!(items[0].qty, Some(12));
        assert_eq!(items[1].style, "ZQBQ10M");
        assert_eq!(items[1].qty, Some(1200));
        assert_eq!(items[1].total_amount, Some(Decimal::new(960000, 2)));
        assert!(items.iter().all(|i| i.po == "654321"));
    }

    #[test]
    fn test_row_without_style_code_is_skipped() {
        let text = "123456 REVISION\n\
                    2QBQ99A 001 BLACK L GODZILLA CLASSIC KING OF MINI 4 12.50 50.00\n\
                    ZQBQ99A 001 BLACK XL GODZILLA CLASSIC KING OF MINI 6 12.50 75.00";
        let items = RippleJunction.extract(text);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty, Some(6));
    }

    #[test]
    fn test_missing_po_is_empty() {
        let items =
            RippleJunction.extract("ZQBQ1 001 BLACK S GODZILLA CLASSIC KING OF MINI 1 2.00 2.00");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].po, "");
    }
}
