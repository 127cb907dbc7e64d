//! CSV tables read with the Polars CSV reader.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Rows sampled for dtype inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Reads a CSV file with a single header row.
pub fn read_csv_path(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let parse_error = |e: PolarsError| IngestError::CsvParse {
        source_name: path.display().to_string(),
        message: e.to_string(),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    tracing::debug!(path = %path.display(), rows = df.height(), "read CSV file");
    Ok(df)
}

/// Parses in-memory CSV bytes (for example a downloaded object).
pub fn read_csv_bytes(source_name: &str, bytes: Vec<u8>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    tracing::debug!(source = source_name, rows = df.height(), "parsed CSV bytes");
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "product_name,weight\nPuzzle,400g\nDog bed,2kg\n").unwrap();

        let df = read_csv_path(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("weight").unwrap().str().unwrap().get(1), Some("2kg"));
    }

    #[test]
    fn missing_file() {
        let result = read_csv_path(Path::new("/nonexistent/products.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn reads_bytes() {
        let df = read_csv_bytes("inline", b"a,b\n1,x\n2,y\n".to_vec()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Int64);
    }
}
