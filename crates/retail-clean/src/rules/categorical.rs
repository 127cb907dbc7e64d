//! Categorical allow-list filtering.

use polars::prelude::DataFrame;

use crate::error::Result;

use super::map_text_column;

/// Replaces values outside `allowed` with null; the column becomes `String`.
///
/// Membership is exact (case- and whitespace-sensitive). Used for card
/// providers, store types, product categories, availability and time periods.
pub fn filter_categories(df: &mut DataFrame, column: &str, allowed: &[String]) -> Result<usize> {
    let count = map_text_column(df, column, |value| {
        allowed
            .iter()
            .any(|candidate| candidate == value)
            .then(|| value.to_string())
    })?;
    if count > 0 {
        tracing::debug!(column, nulled = count, "filtered values outside category set");
    }
    Ok(count)
}
