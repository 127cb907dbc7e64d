//! The source adapter contract and local file sources.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use crate::csv::read_csv_path;
use crate::error::{IngestError, Result};
use crate::json::read_json_path;

/// Anything that can produce a raw DataFrame for one entity.
pub trait SourceAdapter {
    /// Human-readable location, used in logs and summaries.
    fn describe(&self) -> String;

    /// Extract the whole source into memory.
    fn fetch(&self) -> Result<DataFrame>;
}

/// A local CSV or JSON file, chosen by extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceAdapter for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<DataFrame> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => read_csv_path(&self.path),
            "json" => read_json_path(&self.path),
            _ => Err(IngestError::UnsupportedFileType {
                location: self.describe(),
                extension,
            }),
        }
    }
}
