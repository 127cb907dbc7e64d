//! Shared utilities for the retail ETL crates.
//!
//! This crate provides common utilities used across the workspace:
//! Polars `AnyValue` conversions, numeric parsing and formatting,
//! building typed DataFrames from dynamically typed source cells, and
//! redaction of row-level values in logs.

pub mod cells;
pub mod polars;
pub mod redact;

// Re-export commonly used functions at crate root for convenience
pub use cells::{CellValue, build_frame};
pub use polars::{
    any_to_f64, any_to_i64, any_to_string, any_to_text, column_texts, format_numeric, parse_f64,
    parse_i64,
};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
