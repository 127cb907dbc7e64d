//! Source adapters for the retail ETL.
//!
//! Every adapter implements [`SourceAdapter`] and returns the whole source
//! as a Polars DataFrame:
//! - [`StoreApi`]: store details REST API, one request per store
//! - [`PdfSource`]: a table printed across the pages of a PDF
//! - [`ObjectStorageSource`]: CSV or JSON objects in S3, fetched over HTTPS
//! - [`FileSource`]: local CSV or JSON files

pub mod api;
pub mod csv;
pub mod error;
pub mod http;
pub mod json;
pub mod object_store;
pub mod pdf;
pub mod source;

use std::path::Path;

pub use api::{ApiConfig, StoreApi};
pub use error::{IngestError, Result};
pub use http::HttpClient;
pub use json::{frame_from_json, records_to_frame};
pub use object_store::{ObjectFormat, ObjectLocation, ObjectStorageSource};
pub use pdf::{PdfSource, PdfTableLayout, parse_table_text};
pub use source::{FileSource, SourceAdapter};

/// Reads a whole file, distinguishing a missing file from other I/O errors.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}
