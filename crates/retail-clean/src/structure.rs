//! Row and column edits applied around the column rules.
//!
//! Unlike rules, some of these edits remove rows: dropping null rows and
//! exact duplicates are the only places rows leave a frame.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use retail_common::any_to_text;

use crate::error::Result;
use crate::rules::{map_text_column, put_strings, require_column, texts};
use crate::types::NullPolicy;

/// Drops the named columns. Every column must exist.
pub fn drop_columns(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    for column in columns {
        require_column(df, column)?;
    }
    for column in columns {
        df.drop_in_place(column)?;
    }
    Ok(columns.len())
}

/// Renames a column.
///
/// Renaming is skipped when `from` is gone and `to` already exists, so a
/// frame that was renamed once passes through unchanged.
pub fn rename_column(df: &mut DataFrame, from: &str, to: &str) -> Result<usize> {
    if df.column(from).is_err() && df.column(to).is_ok() {
        return Ok(0);
    }
    require_column(df, from)?;
    df.rename(from, to.into())?;
    Ok(1)
}

/// Drops rows with nulls; returns the number of rows removed.
///
/// [`NullPolicy::Any`] removes rows with at least one null,
/// [`NullPolicy::All`] only rows where every cell is null.
pub fn drop_nulls(df: &mut DataFrame, policy: NullPolicy) -> Result<usize> {
    let height = df.height();
    if height == 0 || df.width() == 0 {
        return Ok(0);
    }

    let mut keep = vec![policy == NullPolicy::Any; height];
    for column in df.get_columns() {
        let present = column.as_materialized_series().is_not_null();
        for (idx, is_present) in present.into_iter().enumerate() {
            let is_present = is_present.unwrap_or(false);
            match policy {
                NullPolicy::Any => keep[idx] &= is_present,
                NullPolicy::All => keep[idx] |= is_present,
            }
        }
    }

    filter_rows(df, &keep, "drop_nulls")
}

/// Drops exact duplicate rows, keeping the first occurrence.
///
/// Rows compare by the text form of every cell, with nulls equal to each other.
pub fn drop_duplicates(df: &mut DataFrame) -> Result<usize> {
    let height = df.height();
    if height == 0 {
        return Ok(0);
    }

    let columns = df.get_columns();
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(height);
    let mut keep = Vec::with_capacity(height);
    for idx in 0..height {
        let mut key = Vec::with_capacity(columns.len());
        for column in columns {
            key.push(any_to_text(column.get(idx)?));
        }
        keep.push(seen.insert(key));
    }

    filter_rows(df, &keep, "drop_duplicates")
}

/// Replaces every cell equal to `from` with `to`; the column becomes `String`.
pub fn replace_value(df: &mut DataFrame, column: &str, from: &str, to: &str) -> Result<usize> {
    let before = texts(df, column)?;
    let replaced = before.iter().flatten().filter(|value| *value == from).count();
    map_text_column(df, column, |value| {
        let value = if value == from { to } else { value };
        Some(value.to_string())
    })?;
    Ok(replaced)
}

/// Fills the nulls of the first row with `placeholder`.
///
/// Columns that receive the placeholder become `String`. Returns the number
/// of cells filled.
pub fn repair_first_row(df: &mut DataFrame, placeholder: &str) -> Result<usize> {
    if df.height() == 0 {
        return Ok(0);
    }

    let mut targets = Vec::new();
    for column in df.get_columns() {
        if column.get(0)?.is_null() {
            targets.push(column.name().to_string());
        }
    }

    for name in &targets {
        let mut values = texts(df, name)?;
        if let Some(first) = values.first_mut() {
            *first = Some(placeholder.to_string());
        }
        put_strings(df, name, values)?;
    }
    Ok(targets.len())
}

fn filter_rows(df: &mut DataFrame, keep: &[bool], label: &str) -> Result<usize> {
    let removed = keep.iter().filter(|k| !**k).count();
    if removed == 0 {
        return Ok(0);
    }
    let mask = BooleanChunked::from_slice(label.into(), keep);
    *df = df.filter(&mask)?;
    Ok(removed)
}
