//! Column-level cleaning rules.
//!
//! Every rule takes the DataFrame by mutable reference, rewrites one or more
//! named columns in place and returns the number of cells it replaced with
//! null (or otherwise rewrote). Rules never reorder or remove rows, and
//! applying a rule twice gives the same result as applying it once.

pub mod categorical;
pub mod country;
pub mod datetime;
pub mod identifiers;
pub mod numeric;
pub mod weight;

pub use categorical::filter_categories;
pub use country::{clean_country_code, clean_phone_numbers, is_valid_phone};
pub use datetime::{
    clean_dates, parse_date_column, parse_expiry, parse_expiry_column, parse_mixed_date,
    parse_time_column, parse_time_of_day,
};
pub use identifiers::{
    clean_card_numbers, clean_uuids, enforce_card_number_length, is_valid_uuid,
    sanitize_card_number,
};
pub use numeric::{clean_lat_long, coerce_integer, integer_strings};
pub use weight::{convert_weight, convert_weights};

use polars::prelude::*;
use retail_common::column_texts;

use crate::error::{CleanError, Result};

/// Fails with [`CleanError::ColumnNotFound`] unless the column exists.
pub(crate) fn require_column(df: &DataFrame, column: &str) -> Result<()> {
    if df.column(column).is_err() {
        return Err(CleanError::ColumnNotFound {
            column: column.to_string(),
        });
    }
    Ok(())
}

/// Reads a column as text, preserving nulls.
pub(crate) fn texts(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    require_column(df, column)?;
    Ok(column_texts(df, column)?)
}

/// Replaces a column (keeping its position) with string values.
pub(crate) fn put_strings(df: &mut DataFrame, column: &str, values: Vec<Option<String>>) -> Result<()> {
    df.with_column(Series::new(column.into(), values))?;
    Ok(())
}

/// Counts cells that were present before and are null after.
pub(crate) fn nulled<T>(before: &[Option<String>], after: &[Option<T>]) -> usize {
    before
        .iter()
        .zip(after)
        .filter(|(b, a)| b.is_some() && a.is_none())
        .count()
}

/// Applies a text-to-text rule to one column, returning the nulled count.
pub(crate) fn map_text_column<F>(df: &mut DataFrame, column: &str, rule: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let before = texts(df, column)?;
    let after: Vec<Option<String>> = before
        .iter()
        .map(|value| value.as_deref().and_then(&rule))
        .collect();
    let count = nulled(&before, &after);
    put_strings(df, column, after)?;
    Ok(count)
}
