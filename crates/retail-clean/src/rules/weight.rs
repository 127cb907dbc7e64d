//! Product weight normalization to kilograms.

use polars::prelude::*;
use retail_common::{parse_f64, redact_value};

use crate::error::Result;

use super::{nulled, texts};

/// Grams (and millilitres) per kilogram.
const GRAMS_PER_KG: f64 = 1000.0;

/// Ounces per kilogram.
const OUNCES_PER_KG: f64 = 35.274;

/// Converts a weight such as `"400g"`, `"16oz"` or `"3 x 400g"` to kilograms.
///
/// The text before the first `x` is a pack multiplier. Units are detected
/// by substring in the order `kg`, `g`, `oz`, `ml`; values without a known
/// unit are returned as-is.
pub fn convert_weight(value: &str) -> Option<f64> {
    let (multiplier, magnitude) = match value.split_once('x') {
        Some((quantity, rest)) => (Some(quantity.trim()), rest.trim()),
        None => (None, value.trim()),
    };

    let digits: String = magnitude
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let number: f64 = digits.parse().ok()?;

    let unit = magnitude.to_lowercase();
    let mut kilograms = if unit.contains("kg") {
        number
    } else if unit.contains('g') {
        number / GRAMS_PER_KG
    } else if unit.contains("oz") {
        number / OUNCES_PER_KG
    } else if unit.contains("ml") {
        number / GRAMS_PER_KG
    } else {
        number
    };

    if let Some(quantity) = multiplier.filter(|q| !q.is_empty()) {
        kilograms *= parse_f64(quantity)?;
    }

    kilograms.is_finite().then_some(kilograms)
}

/// Converts a weight column to kilograms; the column becomes `Float64`.
///
/// Values that cannot be converted become null and are reported at warn level.
pub fn convert_weights(df: &mut DataFrame, column: &str) -> Result<usize> {
    let before = texts(df, column)?;
    let after: Vec<Option<f64>> = before
        .iter()
        .map(|value| {
            let value = value.as_deref()?;
            let converted = convert_weight(value);
            if converted.is_none() {
                tracing::warn!(
                    column,
                    value = %redact_value(value),
                    "could not convert weight to kg"
                );
            }
            converted
        })
        .collect();
    let count = nulled(&before, &after);
    df.with_column(Series::new(column.into(), after))?;
    Ok(count)
}
