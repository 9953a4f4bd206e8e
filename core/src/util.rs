//! Small string and time helpers.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use thiserror::Error;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Layout accepted by `timestamp_date_of_string`.
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// True once more than `ttl_seconds` have passed since `created_at`.
pub fn is_expired(created_at: DateTime<Utc>, ttl_seconds: i64) -> bool {
    is_expired_at(created_at, ttl_seconds, Utc::now())
}

/// `is_expired` against an explicit clock. Exactly at the expiry instant the
/// value is still valid.
pub fn is_expired_at(created_at: DateTime<Utc>, ttl_seconds: i64, now: DateTime<Utc>) -> bool {
    match TimeDelta::try_seconds(ttl_seconds).and_then(|ttl| created_at.checked_add_signed(ttl)) {
        Some(expires_at) => now > expires_at,
        // Out of range: a huge positive ttl never expires, a huge negative one always has.
        None => ttl_seconds < 0,
    }
}

#[derive(Debug, Error)]
pub enum DateParseError {
    #[error("date {0:?} does not match YYYY-MM-DD")]
    Layout(String),
    #[error(transparent)]
    Invalid(#[from] chrono::ParseError),
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
///
/// The layout is strict: four-digit year, two-digit month and day, no sign
/// and no surrounding whitespace.
pub fn timestamp_date_of_string(s: &str) -> Result<DateTime<Utc>, DateParseError> {
    if !has_date_layout(s) {
        return Err(DateParseError::Layout(s.to_string()));
    }
    let date = NaiveDate::parse_from_str(s, DATE_ONLY_FORMAT)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn has_date_layout(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Flip `outer -> inner -> value` into `value -> outer -> inner`.
///
/// When two entries of the same outer key share a value, the survivor is
/// whichever the map iteration visits last.
pub fn reverse_mapping(mappings: &HashMap<String, HashMap<String, String>>) -> HashMap<String, HashMap<String, String>> {
    let mut reversed: HashMap<String, HashMap<String, String>> = HashMap::new();
    for (outer, inner) in mappings {
        for (inner_key, value) in inner {
            reversed
                .entry(value.clone())
                .or_default()
                .insert(outer.clone(), inner_key.clone());
        }
    }
    reversed
}

pub fn reverse_string(input: &str) -> String {
    input.chars().rev().collect()
}

/// Insert `ch` before the first decimal digit (Unicode `Nd`) of `input`.
pub fn insert_rune(input: &str, ch: char) -> String {
    match input.find(is_decimal_digit) {
        Some(idx) => {
            let mut out = String::with_capacity(input.len() + ch.len_utf8());
            out.push_str(&input[..idx]);
            out.push(ch);
            out.push_str(&input[idx..]);
            out
        }
        None => input.to_string(),
    }
}

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || get_general_category(c) == GeneralCategory::DecimalNumber
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn map(entries: &[(&str, &[(&str, &str)])]) -> HashMap<String, HashMap<String, String>> {
        entries
            .iter()
            .map(|(outer, inner)| {
                let inner = inner.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
                (outer.to_string(), inner)
            })
            .collect()
    }

    #[test]
    fn expiry_boundary_is_not_expired() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let at = |secs: i64| created + TimeDelta::seconds(secs);
        assert!(!is_expired_at(created, 60, at(59)));
        assert!(!is_expired_at(created, 60, at(60)));
        assert!(is_expired_at(created, 60, at(61)));
    }

    #[test]
    fn expiry_against_wall_clock() {
        let now = Utc::now();
        assert!(!is_expired(now, 3600));
        assert!(is_expired(now - TimeDelta::hours(2), 3600));
    }

    #[test]
    fn expiry_handles_extreme_ttl() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_expired_at(created, i64::MAX, created));
        assert!(is_expired_at(created, i64::MIN, created));
    }

    #[test]
    fn parses_date_only() {
        let ts = timestamp_date_of_string("2023-02-28").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(timestamp_date_of_string("28.02.2023").is_err());
        assert!(timestamp_date_of_string("2023-02-30").is_err());
        assert!(timestamp_date_of_string("").is_err());
    }

    #[test]
    fn rejects_loose_date_layouts() {
        for input in ["2023-2-8", " 2023-02-28", "2023-02-28 ", "+2023-02-28", "02023-02-28", "2023/02/28"] {
            assert!(
                matches!(timestamp_date_of_string(input), Err(DateParseError::Layout(_))),
                "{input:?} should be rejected"
            );
        }
        assert!(matches!(timestamp_date_of_string("2023-13-01"), Err(DateParseError::Invalid(_))));
    }

    #[test]
    fn reverse_mapping_flips_value_and_outer_key() {
        let reversed = reverse_mapping(&map(&[("a", &[("x", "1")]), ("b", &[("y", "1")])]));
        assert_eq!(reversed, map(&[("1", &[("a", "x"), ("b", "y")])]));
    }

    #[test]
    fn reverse_mapping_of_empty_is_empty() {
        assert!(reverse_mapping(&HashMap::new()).is_empty());
    }

    #[test]
    fn reverses_strings_by_char() {
        assert_eq!(reverse_string("claim123"), "321mialc");
        assert_eq!(reverse_string("Grüße"), "eßürG");
        assert_eq!(reverse_string(""), "");
        let s = "Schadensmeldung 42 🚗";
        assert_eq!(reverse_string(&reverse_string(s)), s);
    }

    #[test]
    fn inserts_before_first_digit() {
        assert_eq!(insert_rune("ABC123", '-'), "ABC-123");
        assert_eq!(insert_rune("ABCDEF", '-'), "ABCDEF");
        assert_eq!(insert_rune("42", '#'), "#42");
        assert_eq!(insert_rune("ÄÖ7", '/'), "ÄÖ/7");
        assert_eq!(insert_rune("", '-'), "");
    }

    #[test]
    fn inserts_before_non_ascii_decimal_digit() {
        // U+0663 ARABIC-INDIC DIGIT THREE, U+FF11 FULLWIDTH DIGIT ONE
        assert_eq!(insert_rune("AB\u{0663}4", '-'), "AB-\u{0663}4");
        assert_eq!(insert_rune("AB\u{FF11}", '-'), "AB-\u{FF11}");
        // Superscripts are numbers but not decimal digits.
        assert_eq!(insert_rune("x\u{00B2}", '-'), "x\u{00B2}");
    }
}
