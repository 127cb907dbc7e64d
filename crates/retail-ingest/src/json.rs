//! JSON tables.
//!
//! Two layouts are accepted:
//! - records: `[{"col": v, ...}, ...]`
//! - columns keyed by row label: `{"col": {"0": v, "1": v}, ...}`
//!
//! Column order follows first appearance in the document.

use std::path::Path;

use polars::prelude::DataFrame;
use retail_common::{CellValue, build_frame};
use serde_json::{Map, Value};

use crate::error::{IngestError, Result};

/// Reads a JSON file into a DataFrame.
pub fn read_json_path(path: &Path) -> Result<DataFrame> {
    let bytes = crate::read_file(path)?;
    frame_from_json(&path.display().to_string(), &bytes)
}

/// Parses a JSON document (records or column-oriented) into a DataFrame.
pub fn frame_from_json(source_name: &str, bytes: &[u8]) -> Result<DataFrame> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| IngestError::JsonParse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    let df = match value {
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(map) => records.push(map),
                    other => {
                        return Err(shape_error(
                            source_name,
                            format!("array element is {}, expected an object", kind(&other)),
                        ));
                    }
                }
            }
            records_to_frame(&records)?
        }
        Value::Object(columns) => columns_to_frame(source_name, columns)?,
        other => {
            return Err(shape_error(
                source_name,
                format!("top-level value is {}", kind(&other)),
            ));
        }
    };

    tracing::debug!(
        source = source_name,
        rows = df.height(),
        columns = df.width(),
        "parsed JSON table"
    );
    Ok(df)
}

/// Builds a DataFrame from JSON objects, one per row.
///
/// Missing keys become nulls; the column set is the union of all keys.
pub fn records_to_frame(records: &[Map<String, Value>]) -> Result<DataFrame> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows: Vec<Vec<CellValue>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|header| record.get(header).map_or(CellValue::Null, to_cell))
                .collect()
        })
        .collect();

    Ok(build_frame(&headers, rows)?)
}

fn columns_to_frame(source_name: &str, columns: Map<String, Value>) -> Result<DataFrame> {
    let mut headers = Vec::with_capacity(columns.len());
    let mut by_column = Vec::with_capacity(columns.len());
    for (name, value) in columns {
        let cells = match value {
            Value::Object(cells) => cells,
            other => {
                return Err(shape_error(
                    source_name,
                    format!(
                        "column '{name}' is {}, expected an object of row labels",
                        kind(&other)
                    ),
                ));
            }
        };
        headers.push(name);
        by_column.push(cells);
    }

    let labels = row_labels(&by_column);
    let rows: Vec<Vec<CellValue>> = labels
        .iter()
        .map(|label| {
            by_column
                .iter()
                .map(|cells| cells.get(label).map_or(CellValue::Null, to_cell))
                .collect()
        })
        .collect();

    Ok(build_frame(&headers, rows)?)
}

/// Row labels in first-seen order, sorted numerically when all are integers.
fn row_labels(columns: &[Map<String, Value>]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for cells in columns {
        for label in cells.keys() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    let numeric: Option<Vec<i64>> = labels.iter().map(|l| l.parse().ok()).collect();
    if let Some(numbers) = numeric {
        let mut paired: Vec<(i64, String)> = numbers.into_iter().zip(labels).collect();
        paired.sort_by_key(|(number, _)| *number);
        return paired.into_iter().map(|(_, label)| label).collect();
    }
    labels
}

fn to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(v) => CellValue::Int(v),
            None => n.as_f64().map_or(CellValue::Null, CellValue::Float),
        },
        Value::String(s) => CellValue::Text(s.clone()),
        nested => CellValue::Text(nested.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn shape_error(source_name: &str, reason: String) -> IngestError {
    IngestError::JsonShape {
        source_name: source_name.to_string(),
        reason,
    }
}
