//! Date and time parsing rules.
//!
//! Source systems disagree on date formats: ISO dates, slashed dates,
//! `1968 October 16`, `January 1951 27` and datetimes all appear in the same
//! column. Parsing tries a fixed list of formats in order and keeps the
//! first match; anything unparseable becomes null.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;

use crate::error::Result;

use super::{map_text_column, nulled, require_column, texts};

/// Date-only formats, tried in order.
///
/// Day-first slashed dates are tried before month-first ones.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y %B %d",
    "%B %Y %d",
    "%d %B %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
];

/// Datetime formats whose date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Output format for normalized date strings.
const ISO_DATE: &str = "%Y-%m-%d";

/// Parses a date written in any of the accepted formats.
pub fn parse_mixed_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }

    // Timestamps with an explicit offset
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parses a strict `MM/YY` card expiry into the first day of that month.
pub fn parse_expiry(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let (month, year) = trimmed.split_once('/')?;
    if month.len() != 2 || year.len() != 2 {
        return None;
    }
    NaiveDate::parse_from_str(&format!("01/{month}/{year}"), "%d/%m/%y").ok()
}

/// Parses a strict `HH:MM:SS` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.len() != 8 {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S").ok()
}

/// Normalizes each column to `YYYY-MM-DD` strings; unparseable values become null.
pub fn clean_dates(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut total = 0;
    for column in columns {
        let count = map_text_column(df, column, |value| {
            parse_mixed_date(value).map(|date| date.format(ISO_DATE).to_string())
        })?;
        if count > 0 {
            tracing::debug!(column = %column, nulled = count, "removed unparseable dates");
        }
        total += count;
    }
    Ok(total)
}

/// Converts a column into a `Date` column using the mixed-format parser.
pub fn parse_date_column(df: &mut DataFrame, column: &str) -> Result<usize> {
    to_date_column(df, column, parse_mixed_date)
}

/// Converts a `MM/YY` column into a `Date` column (first day of the month).
pub fn parse_expiry_column(df: &mut DataFrame, column: &str) -> Result<usize> {
    to_date_column(df, column, parse_expiry)
}

/// Converts an `HH:MM:SS` column into a `Time` column.
pub fn parse_time_column(df: &mut DataFrame, column: &str) -> Result<usize> {
    require_column(df, column)?;
    if df.column(column)?.dtype() == &DataType::Time {
        return Ok(0);
    }
    let before = texts(df, column)?;
    let after: Vec<Option<NaiveTime>> = before
        .iter()
        .map(|value| value.as_deref().and_then(parse_time_of_day))
        .collect();
    let count = nulled(&before, &after);
    df.with_column(Series::new(column.into(), after))?;
    Ok(count)
}

fn to_date_column<F>(df: &mut DataFrame, column: &str, parse: F) -> Result<usize>
where
    F: Fn(&str) -> Option<NaiveDate>,
{
    require_column(df, column)?;
    // Already converted; re-parsing the display form would not round-trip
    // for formats such as MM/YY.
    if df.column(column)?.dtype() == &DataType::Date {
        return Ok(0);
    }
    let before = texts(df, column)?;
    let after: Vec<Option<NaiveDate>> = before
        .iter()
        .map(|value| value.as_deref().and_then(&parse))
        .collect();
    let count = nulled(&before, &after);
    df.with_column(Series::new(column.into(), after))?;
    Ok(count)
}
