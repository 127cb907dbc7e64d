//! Error types for database access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the database connector.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database file could not be opened.
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database server could not be reached or refused the login.
    #[error("failed to connect to {target}: {message}")]
    Connect { target: String, message: String },

    /// The config names an engine this build was compiled without.
    #[error("database engine '{engine}' is not enabled in this build")]
    EngineUnavailable { engine: &'static str },

    /// Requested table does not exist.
    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    /// Table name is empty or contains a NUL byte.
    #[error("invalid table name '{table}'")]
    InvalidTableName { table: String },

    /// Frame has no columns, so no table can be created.
    #[error("cannot upload '{table}': frame has no columns")]
    NoColumns { table: String },

    /// SQL statement failed.
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Postgres statement failed.
    #[cfg(feature = "postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] diesel::result::Error),

    /// Stored rows could not be turned into a frame.
    #[error("failed to decode rows of '{table}': {message}")]
    Decode { table: String, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;
