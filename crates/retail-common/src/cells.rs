//! Building typed DataFrames from dynamically typed cells.
//!
//! JSON payloads, SQLite rows and extracted PDF text all arrive as loosely
//! typed values. Each column's dtype is inferred from its non-null cells:
//! integers stay `Int64`, mixed integer/float columns become `Float64`,
//! all-boolean columns become `Boolean`, and everything else becomes `String`.

use polars::prelude::*;

/// A single dynamically typed source value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text rendering used when a column falls back to `String`.
    fn into_text(self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(v) => Some(v.to_string()),
            CellValue::Float(v) => Some(crate::format_numeric(v)),
            CellValue::Text(s) => Some(s),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CellValue::Null, CellValue::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inferred {
    Empty,
    Bool,
    Int,
    Float,
    Text,
}

fn infer(cells: &[CellValue]) -> Inferred {
    let mut inferred = Inferred::Empty;
    for cell in cells {
        let next = match cell {
            CellValue::Null => continue,
            CellValue::Bool(_) => Inferred::Bool,
            CellValue::Int(_) => Inferred::Int,
            CellValue::Float(_) => Inferred::Float,
            CellValue::Text(_) => return Inferred::Text,
        };
        inferred = match (inferred, next) {
            (Inferred::Empty, n) => n,
            (a, b) if a == b => a,
            (Inferred::Int, Inferred::Float) | (Inferred::Float, Inferred::Int) => Inferred::Float,
            _ => return Inferred::Text,
        };
    }
    inferred
}

fn build_column(name: &str, cells: Vec<CellValue>) -> Column {
    match infer(&cells) {
        Inferred::Bool => {
            let values: Vec<Option<bool>> = cells
                .into_iter()
                .map(|cell| match cell {
                    CellValue::Bool(b) => Some(b),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        Inferred::Int => {
            let values: Vec<Option<i64>> = cells
                .into_iter()
                .map(|cell| match cell {
                    CellValue::Int(v) => Some(v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        Inferred::Float => {
            let values: Vec<Option<f64>> = cells
                .into_iter()
                .map(|cell| match cell {
                    CellValue::Int(v) => Some(v as f64),
                    CellValue::Float(v) => Some(v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        Inferred::Empty | Inferred::Text => {
            let values: Vec<Option<String>> =
                cells.into_iter().map(CellValue::into_text).collect();
            Series::new(name.into(), values).into_column()
        }
    }
}

/// Builds a DataFrame from row-major cells.
///
/// Rows shorter than `headers` are padded with nulls; extra cells are ignored.
///
/// # Errors
///
/// Returns an error if header names are not unique.
pub fn build_frame(headers: &[String], rows: Vec<Vec<CellValue>>) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Vec<CellValue>> = headers
        .iter()
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();
    for row in rows {
        let mut cells = row.into_iter();
        for column in &mut columns {
            column.push(cells.next().unwrap_or(CellValue::Null));
        }
    }
    let built: Vec<Column> = headers
        .iter()
        .zip(columns)
        .map(|(name, cells)| build_column(name, cells))
        .collect();
    DataFrame::new(built)
}
