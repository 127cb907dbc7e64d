//! Error types for cleaning operations.

use thiserror::Error;

/// Structural errors raised while cleaning a DataFrame.
///
/// Bad cell values are never errors; they are replaced with null.
#[derive(Debug, Error)]
pub enum CleanError {
    /// A column required by a rule or edit does not exist.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result type for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CleanError::ColumnNotFound {
            column: "country_code".to_string(),
        };
        assert_eq!(err.to_string(), "column 'country_code' not found");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let err: CleanError = polars_err.into();
        assert!(matches!(err, CleanError::Polars(_)));
    }
}
