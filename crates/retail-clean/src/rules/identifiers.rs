//! Identifier rules: UUIDs and payment card numbers.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;
use retail_model::categories::card_number_length;

use crate::error::Result;

use super::{map_text_column, nulled, put_strings, texts};

/// Canonical 8-4-4-4-12 hexadecimal UUID form.
static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("Invalid UUID regex")
});

pub fn is_valid_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

/// Nulls values that are not canonical UUIDs in each column.
pub fn clean_uuids(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut total = 0;
    for column in columns {
        let count = map_text_column(df, column, |value| {
            is_valid_uuid(value).then(|| value.to_string())
        })?;
        if count > 0 {
            tracing::debug!(column = %column, nulled = count, "removed invalid UUIDs");
        }
        total += count;
    }
    Ok(total)
}

/// Strips `?` characters from a card number and checks the rest is all digits.
///
/// Returns `None` when nothing is left or a non-digit remains.
pub fn sanitize_card_number(value: &str) -> Option<String> {
    let stripped: String = value.chars().filter(|c| *c != '?').collect();
    if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(stripped)
}

/// Sanitizes a card number column; the column becomes `String`.
pub fn clean_card_numbers(df: &mut DataFrame, column: &str) -> Result<usize> {
    let count = map_text_column(df, column, sanitize_card_number)?;
    if count > 0 {
        tracing::debug!(column, nulled = count, "removed invalid card numbers");
    }
    Ok(count)
}

/// Nulls card numbers whose length differs from their provider's card length.
///
/// Rows with a null provider, or a provider without a known length, are
/// left untouched.
pub fn enforce_card_number_length(
    df: &mut DataFrame,
    number_column: &str,
    provider_column: &str,
) -> Result<usize> {
    let providers = texts(df, provider_column)?;
    let before = texts(df, number_column)?;
    let after: Vec<Option<String>> = before
        .iter()
        .zip(&providers)
        .map(|(number, provider)| {
            let expected = provider.as_deref().and_then(card_number_length);
            match (number, expected) {
                (Some(number), Some(len)) if number.chars().count() != len => None,
                _ => number.clone(),
            }
        })
        .collect();
    let count = nulled(&before, &after);
    put_strings(df, number_column, after)?;
    if count > 0 {
        tracing::debug!(column = number_column, nulled = count, "removed card numbers of wrong length");
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn uuid_validation() {
        assert!(is_valid_uuid("123e4567-e89b-12d3-a456-426614174000"));
        assert!(is_valid_uuid("93CAF182-E4E9-4C6E-BEBB-60A1A7DCF9B8"));
        assert!(!is_valid_uuid("not-a-uuid"));
        assert!(!is_valid_uuid("123e4567e89b12d3a456426614174000"));
        assert!(!is_valid_uuid(" 123e4567-e89b-12d3-a456-426614174000"));
    }

    #[test]
    fn uuid_rule_nulls_invalid_values() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "user_uuid".into(),
                vec![Some("123e4567-e89b-12d3-a456-426614174000"), Some("not-a-uuid"), None],
            )
            .into_column(),
        ])
        .unwrap();

        let count = clean_uuids(&mut df, &["user_uuid".to_string()]).unwrap();

        assert_eq!(count, 1);
        let col = df.column("user_uuid").unwrap().str().unwrap();
        assert_eq!(col.get(0), Some("123e4567-e89b-12d3-a456-426614174000"));
        assert_eq!(col.get(1), None);
    }

    #[test]
    fn card_number_sanitizing() {
        assert_eq!(sanitize_card_number("??4971858637664481"), Some("4971858637664481".to_string()));
        assert_eq!(sanitize_card_number("30060773296197"), Some("30060773296197".to_string()));
        assert_eq!(sanitize_card_number("???"), None);
        assert_eq!(sanitize_card_number("NB71VBAHJE"), None);
        assert_eq!(sanitize_card_number("4971 8586"), None);
    }

    #[test]
    fn integer_card_numbers_become_strings() {
        let mut df = DataFrame::new(vec![
            Series::new("card_number".into(), vec![4971858637664481i64]).into_column(),
        ])
        .unwrap();

        clean_card_numbers(&mut df, "card_number").unwrap();

        let col = df.column("card_number").unwrap();
        assert_eq!(col.dtype(), &DataType::String);
        assert_eq!(col.str().unwrap().get(0), Some("4971858637664481"));
    }

    #[test]
    fn card_length_depends_on_provider() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "card_number".into(),
                vec!["4971858637664481", "497185863766", "349624180933183", "1234"],
            )
            .into_column(),
            Series::new(
                "card_provider".into(),
                vec![Some("VISA 16 digit"), Some("VISA 16 digit"), Some("American Express"), None],
            )
            .into_column(),
        ])
        .unwrap();

        let count = enforce_card_number_length(&mut df, "card_number", "card_provider").unwrap();

        assert_eq!(count, 1);
        let col = df.column("card_number").unwrap().str().unwrap();
        assert_eq!(col.get(0), Some("4971858637664481"));
        assert_eq!(col.get(1), None);
        assert_eq!(col.get(2), Some("349624180933183"));
        assert_eq!(col.get(3), Some("1234"));
    }
}
