//! Numeric rules: coordinates, integer counts and integer strings.

use polars::prelude::*;
use retail_common::{any_to_f64, any_to_i64, format_numeric, parse_f64, parse_i64};

use crate::error::Result;

use super::{map_text_column, require_column};

/// Normalizes coordinate columns to canonical numeric strings.
///
/// `"-0.12760"` becomes `"-0.1276"`; non-numeric values become null.
pub fn clean_lat_long(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut total = 0;
    for column in columns {
        let count = map_text_column(df, column, |value| parse_f64(value).map(format_numeric))?;
        if count > 0 {
            tracing::debug!(column = %column, nulled = count, "removed non-numeric coordinates");
        }
        total += count;
    }
    Ok(total)
}

/// Converts a column to `Int64`.
///
/// With `truncate`, fractional numbers keep their integer part (`3.7` becomes
/// `3`); without it only integral numbers convert. Values that do not
/// convert take `fallback` (null when `None`). Returns the number of present
/// values that did not convert.
pub fn coerce_integer(
    df: &mut DataFrame,
    column: &str,
    fallback: Option<i64>,
    truncate: bool,
) -> Result<usize> {
    require_column(df, column)?;
    let series = df.column(column)?;
    let mut values: Vec<Option<i64>> = Vec::with_capacity(df.height());
    let mut replaced = 0;
    for idx in 0..df.height() {
        let value = series.get(idx)?;
        let present = !value.is_null();
        let converted = if truncate {
            any_to_f64(value).and_then(truncated)
        } else {
            any_to_i64(value)
        };
        match converted {
            Some(number) => values.push(Some(number)),
            None => {
                if present {
                    replaced += 1;
                }
                values.push(fallback);
            }
        }
    }
    df.with_column(Series::new(column.into(), values))?;
    if replaced > 0 {
        tracing::debug!(column, replaced, ?fallback, truncate, "replaced non-integer values");
    }
    Ok(replaced)
}

fn truncated(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Rewrites numeric columns as integer strings (`"2019.0"` becomes `"2019"`).
///
/// Non-numeric and fractional values become null.
pub fn integer_strings(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut total = 0;
    for column in columns {
        let count = map_text_column(df, column, |value| {
            parse_i64(value).map(|number| number.to_string())
        })?;
        if count > 0 {
            tracing::debug!(column = %column, nulled = count, "removed non-integer values");
        }
        total += count;
    }
    Ok(total)
}
