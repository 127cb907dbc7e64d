//! Country code and country-specific phone number rules.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;

use crate::error::Result;

use super::{map_text_column, nulled, put_strings, texts};

/// UK numbers: optional `+44 (0)` prefix, optional area-code grouping,
/// 10-11 digit bodies.
static UK_PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:\+44\s?\(0\)\s?\d{2,4}|\(?\d{2,5}\)?)\s?\d{3,4}\s?\d{3,4}$|\d{10,11}|\+44\s?\d{2,5}\s?\d{3,4}\s?\d{3,4})$",
    )
    .expect("Invalid UK phone regex")
});

/// German numbers: parenthesized area codes, dashes, slashes and dots
/// allowed; at least six digit groups.
static DE_PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\(?([\d \-\)–\+/\(]+){6,}\)?([ .\-–/]?)([\d]+))")
        .expect("Invalid DE phone regex")
});

/// US numbers: `(NNN) NNN-NNNN`, `NNN-NNN-NNNN` or space separated.
static US_PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\(?\d{3}\)?-? *\d{3}-? *-?\d{4})").expect("Invalid US phone regex")
});

/// Nulls country codes longer than two characters; the column becomes `String`.
///
/// Length is the only signal: garbled entries such as `GGB` or
/// `QVUW9JSKY3` are removed, valid two-letter codes pass through unchanged.
pub fn clean_country_code(df: &mut DataFrame, column: &str) -> Result<usize> {
    map_text_column(df, column, |value| {
        (value.chars().count() <= 2).then(|| value.to_string())
    })
}

/// Validates a phone number for the given country code.
///
/// Returns `None` for countries without a pattern: only `GB`, `DE` and
/// `US` numbers are checked. Patterns match from the start of the value.
pub fn is_valid_phone(country_code: &str, phone: &str) -> Option<bool> {
    let regex = match country_code {
        "GB" => &*UK_PHONE_REGEX,
        "DE" => &*DE_PHONE_REGEX,
        "US" => &*US_PHONE_REGEX,
        _ => return None,
    };
    Some(regex.is_match(phone))
}

/// Nulls phone numbers that do not match their country's pattern.
///
/// Requires a cleaned country code column. Rows with other or null country
/// codes keep their phone number untouched.
pub fn clean_phone_numbers(
    df: &mut DataFrame,
    phone_column: &str,
    country_column: &str,
) -> Result<usize> {
    let countries = texts(df, country_column)?;
    let before = texts(df, phone_column)?;
    let after: Vec<Option<String>> = before
        .iter()
        .zip(&countries)
        .map(|(phone, country)| {
            let Some(country) = country.as_deref() else {
                return phone.clone();
            };
            let phone = phone.as_deref()?;
            match is_valid_phone(country, phone) {
                Some(false) => None,
                _ => Some(phone.to_string()),
            }
        })
        .collect();
    let count = nulled(&before, &after);
    put_strings(df, phone_column, after)?;
    if count > 0 {
        tracing::debug!(column = phone_column, nulled = count, "removed invalid phone numbers");
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn country_code_nulls_long_values() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "country_code".into(),
                vec![Some("GB"), Some("GGB"), Some("QVUW9JSKY3"), None, Some("US")],
            )
            .into_column(),
        ])
        .unwrap();

        let count = clean_country_code(&mut df, "country_code").unwrap();

        assert_eq!(count, 2);
        let col = df.column("country_code").unwrap().str().unwrap();
        assert_eq!(col.get(0), Some("GB"));
        assert_eq!(col.get(1), None);
        assert_eq!(col.get(2), None);
        assert_eq!(col.get(3), None);
        assert_eq!(col.get(4), Some("US"));
    }

    #[test]
    fn uk_numbers() {
        assert_eq!(is_valid_phone("GB", "+44(0)1632 960 170"), Some(true));
        assert_eq!(is_valid_phone("GB", "(0161) 496 0674"), Some(true));
        assert_eq!(is_valid_phone("GB", "07700900393"), Some(true));
        assert_eq!(is_valid_phone("GB", "+44 7700 900393"), Some(true));
        assert_eq!(is_valid_phone("GB", "not a number"), Some(false));
        assert_eq!(is_valid_phone("GB", "12345"), Some(false));
    }

    #[test]
    fn german_numbers() {
        assert_eq!(is_valid_phone("DE", "(07613) 367833"), Some(true));
        assert_eq!(is_valid_phone("DE", "+49(0)047905356"), Some(true));
        assert_eq!(is_valid_phone("DE", "04101 08472"), Some(true));
        assert_eq!(is_valid_phone("DE", "abc"), Some(false));
    }

    #[test]
    fn us_numbers() {
        assert_eq!(is_valid_phone("US", "(555) 555-1234"), Some(true));
        assert_eq!(is_valid_phone("US", "555-555-1234"), Some(true));
        assert_eq!(is_valid_phone("US", "555 555 1234"), Some(true));
        assert_eq!(is_valid_phone("US", "001-555-1234"), Some(true));
        assert_eq!(is_valid_phone("US", "+1-555-555-1234"), Some(false));
    }

    #[test]
    fn other_countries_are_not_checked() {
        assert_eq!(is_valid_phone("FR", "anything"), None);
    }

    #[test]
    fn phone_rule_only_touches_known_countries() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "country_code".into(),
                vec![Some("GB"), Some("US"), Some("FR"), None, Some("DE")],
            )
            .into_column(),
            Series::new(
                "phone_number".into(),
                vec!["garbage", "(555) 555-1234", "garbage", "garbage", "(030) 1234567"],
            )
            .into_column(),
        ])
        .unwrap();

        let count = clean_phone_numbers(&mut df, "phone_number", "country_code").unwrap();

        assert_eq!(count, 1);
        let col = df.column("phone_number").unwrap().str().unwrap();
        assert_eq!(col.get(0), None);
        assert_eq!(col.get(1), Some("(555) 555-1234"));
        assert_eq!(col.get(2), Some("garbage"));
        assert_eq!(col.get(3), Some("garbage"));
        assert_eq!(col.get(4), Some("(030) 1234567"));
    }

    #[test]
    fn phone_rule_requires_country_column() {
        let mut df = DataFrame::new(vec![
            Series::new("phone_number".into(), vec!["07700900393"]).into_column(),
        ])
        .unwrap();
        let result = clean_phone_numbers(&mut df, "phone_number", "country_code");
        assert!(matches!(
            result,
            Err(crate::CleanError::ColumnNotFound { .. })
        ));
    }
}
