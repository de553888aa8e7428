//! vi-VN display helpers for reports

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Printed in place of any missing field
pub const NOT_AVAILABLE: &str = "(không có)";

const CURRENCY_SYMBOL: &str = "₫";
const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';
const QUANTITY_DECIMALS: u32 = 3;

/// `value` when it holds non-blank text, otherwise `fallback`
pub fn field_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(fallback)
}

/// [`field_or`] with the standard missing-data marker
pub fn or_not_available(value: Option<&str>) -> &str {
    field_or(value, NOT_AVAILABLE)
}

/// VND amount: no decimals, `.` grouping, e.g. `150.000 ₫`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().normalize().to_string();
    format!("{}{} {}", sign, group_thousands(&digits), CURRENCY_SYMBOL)
}

/// Quantity with vi-VN separators and at most three decimals, e.g. `1.250,5`
pub fn format_quantity(quantity: Decimal) -> String {
    let rounded = quantity
        .round_dp_with_strategy(QUANTITY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = format!("{}{}", sign, group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(fraction);
    }
    out
}

/// `dd/mm/yyyy` on the wall clock at `offset`
pub fn format_date(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%d/%m/%Y").to_string()
}

/// Length as the chat channel counts it, in UTF-16 code units
pub fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Split rendered text into parts of at most `max_len` (see [`message_len`]).
///
/// Breaks at the blank lines between order blocks first, then at line ends,
/// then between characters. Text that already fits comes back as one part.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let mut parts = Vec::new();
    pack(text, &["\n\n", "\n"], max_len.max(2), &mut parts);
    parts
}

fn pack(text: &str, separators: &[&str], max_len: usize, parts: &mut Vec<String>) {
    if message_len(text) <= max_len {
        parts.push(text.to_string());
        return;
    }
    let Some((separator, finer)) = separators.split_first() else {
        split_chars(text, max_len, parts);
        return;
    };

    let mut current = String::new();
    for piece in text.split(separator) {
        let joined_len = if current.is_empty() {
            message_len(piece)
        } else {
            message_len(&current) + message_len(separator) + message_len(piece)
        };
        if joined_len <= max_len {
            if !current.is_empty() {
                current.push_str(separator);
            }
            current.push_str(piece);
            continue;
        }

        if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        if message_len(piece) <= max_len {
            current.push_str(piece);
        } else {
            pack(piece, finer, max_len, parts);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
}

fn split_chars(text: &str, max_len: usize, parts: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;
    for c in text.chars() {
        if current_len + c.len_utf16() > max_len {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push(c);
        current_len += c.len_utf16();
    }
    if !current.is_empty() {
        parts.push(current);
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec("150000")), "150.000 ₫");
        assert_eq!(format_currency(dec("10000000")), "10.000.000 ₫");
        assert_eq!(format_currency(dec("999")), "999 ₫");
        assert_eq!(format_currency(Decimal::ZERO), "0 ₫");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec("1249.5")), "1.250 ₫");
        assert_eq!(format_currency(dec("1249.49")), "1.249 ₫");
        assert_eq!(format_currency(dec("-1249.5")), "-1.250 ₫");
        assert_eq!(format_currency(dec("-0.4")), "0 ₫");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec("800")), "800");
        assert_eq!(format_quantity(dec("1250.5")), "1.250,5");
        assert_eq!(format_quantity(dec("0.12345")), "0,123");
        assert_eq!(format_quantity(dec("-2500.000")), "-2.500");
    }

    #[test]
    fn test_format_date_uses_offset() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let late_evening_utc = Utc.with_ymd_and_hms(2024, 3, 14, 20, 0, 0).unwrap();
        assert_eq!(format_date(late_evening_utc, &offset), "15/03/2024");
    }

    #[test]
    fn test_split_message_keeps_short_text_whole() {
        assert_eq!(split_message("Tổng: 1 đơn", 4096), vec!["Tổng: 1 đơn"]);
    }

    #[test]
    fn test_split_message_breaks_between_blocks() {
        let text = "TITLE\n\n1. aaaa\n   bb\n\n2. cccc";
        let parts = split_message(text, 24);
        assert_eq!(parts, vec!["TITLE\n\n1. aaaa\n   bb", "2. cccc"]);
    }

    #[test]
    fn test_split_message_breaks_long_blocks_at_lines_then_chars() {
        let parts = split_message("aaaa\nbbbb\ncccccccccc", 8);
        assert_eq!(parts, vec!["aaaa", "bbbb", "cccccccc", "cc"]);
        for part in &parts {
            assert!(message_len(part) <= 8);
        }
    }

    #[test]
    fn test_message_len_counts_utf16_units() {
        assert_eq!(message_len("Bơ"), 2);
        assert_eq!(message_len("📢"), 2);
        assert_eq!(split_message("📢📢📢", 4), vec!["📢📢", "📢"]);
    }

    #[test]
    fn test_or_not_available() {
        assert_eq!(or_not_available(Some("Lan")), "Lan");
        assert_eq!(or_not_available(Some("  Lan ")), "Lan");
        assert_eq!(or_not_available(Some("   ")), NOT_AVAILABLE);
        assert_eq!(or_not_available(None), NOT_AVAILABLE);
    }
}
