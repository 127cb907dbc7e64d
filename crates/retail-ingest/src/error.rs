//! Error types for source adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting a source into a DataFrame.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Network Errors ===
    /// HTTP client could not be built or the request failed in transit.
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// Server answered with a non-success status.
    #[error("request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Location is not a usable URL.
    #[error("invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {source_name}: {message}")]
    CsvParse { source_name: String, message: String },

    /// Malformed JSON.
    #[error("failed to parse JSON {source_name}: {message}")]
    JsonParse { source_name: String, message: String },

    /// Well-formed JSON that is not a table.
    #[error("unexpected JSON shape in {source_name}: {reason}")]
    JsonShape { source_name: String, reason: String },

    /// Failed to extract text from a PDF.
    #[error("failed to extract PDF text from {source_name}: {message}")]
    PdfExtract { source_name: String, message: String },

    /// No line in the PDF text matched the expected header.
    #[error("could not detect header row in {source_name}")]
    NoHeaderDetected { source_name: String },

    /// Source was read but produced no rows.
    #[error("no data found in {source_name}")]
    EmptySource { source_name: String },

    /// File extension is neither CSV nor JSON.
    #[error("unsupported file type '{extension}' for {location}: expected csv or json")]
    UnsupportedFileType { location: String, extension: String },

    // === Database Errors ===
    /// Reading a database table failed.
    #[error("failed to read table '{table}': {message}")]
    Database { table: String, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
