//! Numeric normalization for OCR'd quantities and money amounts.
//!
//! OCR output mixes `.` and `,` freely, so separators are resolved here once
//! and every grammar goes through the same functions. A token that cannot be
//! read yields `None` rather than an error.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a money amount such as `"$1,234.50"`, `"1234,50"` or `"1.234,50"`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != '\u{00a0}')
        .collect();

    if cleaned.is_empty()
        || !cleaned.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Both present: whichever comes last is the decimal separator
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) => {
            let single = cleaned.matches(',').count() == 1;
            if single && cleaned.len() - c - 1 == 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (None, Some(d)) => {
            if cleaned.matches('.').count() > 1 {
                let (int_part, frac) = cleaned.split_at(d);
                if frac.len() == 3 {
                    format!("{}{}", int_part.replace('.', ""), frac)
                } else {
                    cleaned.replace('.', "")
                }
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Parse an integer quantity, ignoring thousands separators.
pub fn parse_quantity(s: &str) -> Option<u64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    cleaned.parse().ok()
}

/// Unit price from a line total, or `None` when it cannot be computed.
pub fn derive_unit_price(total: Option<Decimal>, qty: Option<u64>) -> Option<Decimal> {
    let qty = qty.filter(|q| *q > 0)?;
    total?.checked_div(Decimal::from(qty))
}

/// Format an amount with comma grouping and two decimals (1,234.50).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}
