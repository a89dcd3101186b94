//! Conversions from captured text to field values.
//!
//! The grammar only ever hands these functions digit runs and separators in
//! the shapes it admits, so anything else is reported as a parse error naming
//! the field instead of being coerced into a wrong value.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{KopeckError, Result};
use crate::pattern::Field;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[\s.,]+").unwrap();
}

fn parse_digits(field: Field, digits: &str, original: &str) -> Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KopeckError::Parse { field, text: original.to_string() });
    }
    digits
        .parse::<u64>()
        .map_err(|_| KopeckError::Parse { field, text: original.to_string() })
}

/// Strips whitespace and group separators, then reads the digits.
/// `"1.234.567"`, `"1 234 567"` and `"1234567"` all give 1234567.
pub fn normalize_integer(text: &str) -> Result<u64> {
    let digits = SEPARATORS.replace_all(text, "");
    parse_digits(Field::Integer, &digits, text)
}

/// Hundredths. A single digit is right-padded, so `"5"` reads as 50.
pub fn normalize_fraction(text: &str) -> Result<u64> {
    let text = text.trim();
    match text.len() {
        1 => parse_digits(Field::Fraction, &format!("{text}0"), text),
        2 => parse_digits(Field::Fraction, text, text),
        _ => Err(KopeckError::Parse { field: Field::Fraction, text: text.to_string() }),
    }
}

/// Minor units, one or two digits taken as is.
pub fn normalize_coins(text: &str) -> Result<u64> {
    let text = text.trim();
    match text.len() {
        1 | 2 => parse_digits(Field::Coins, text, text),
        _ => Err(KopeckError::Parse { field: Field::Coins, text: text.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_shapes() {
        assert_eq!(normalize_integer("100").unwrap(), 100);
        assert_eq!(normalize_integer("1 000").unwrap(), 1000);
        assert_eq!(normalize_integer("1 234 567").unwrap(), 1_234_567);
        assert_eq!(normalize_integer("1 , 234").unwrap(), 1234);
        assert_eq!(normalize_integer("1.234.567").unwrap(), 1_234_567);
        assert_eq!(normalize_integer("1,234,567").unwrap(), 1_234_567);
        assert_eq!(normalize_integer("1234567").unwrap(), 1_234_567);
    }

    #[test]
    fn integer_rejects_foreign_text() {
        let err = normalize_integer("12a").unwrap_err();
        assert!(matches!(err, KopeckError::Parse { field: Field::Integer, ref text } if text == "12a"));
        assert!(normalize_integer(" . ").is_err());
        assert!(normalize_integer("99999999999999999999999").is_err());
    }

    #[test]
    fn fraction_padding() {
        assert_eq!(normalize_fraction("5").unwrap(), 50);
        assert_eq!(normalize_fraction("05").unwrap(), 5);
        assert_eq!(normalize_fraction("99").unwrap(), 99);
        assert!(normalize_fraction("123").is_err());
        assert!(normalize_fraction("").is_err());
    }

    #[test]
    fn coins() {
        assert_eq!(normalize_coins("50").unwrap(), 50);
        assert_eq!(normalize_coins("7").unwrap(), 7);
        assert!(matches!(normalize_coins("150"), Err(KopeckError::Parse { field: Field::Coins, .. })));
    }
}
