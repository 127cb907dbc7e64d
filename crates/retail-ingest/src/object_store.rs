//! Object storage files (S3) fetched over HTTPS.
//!
//! Locations may be `s3://bucket/key` URIs, which are rewritten to the
//! bucket's public HTTPS endpoint, or plain `https://` object URLs. The
//! file type comes from the key's extension.

use std::time::Duration;

use polars::prelude::DataFrame;

use crate::csv::read_csv_bytes;
use crate::error::{IngestError, Result};
use crate::http::{DEFAULT_TIMEOUT, HttpClient};
use crate::json::frame_from_json;
use crate::source::SourceAdapter;

/// Tabular formats stored in object storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFormat {
    Csv,
    Json,
}

impl ObjectFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// A resolved object location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Location as configured.
    pub original: String,
    /// HTTPS URL the object is fetched from.
    pub url: String,
    pub format: ObjectFormat,
}

impl ObjectLocation {
    /// Resolves a location string into a fetchable URL and file format.
    pub fn parse(location: &str) -> Result<Self> {
        let trimmed = location.trim();
        let url = if let Some(rest) = trimmed.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').ok_or_else(|| invalid(trimmed, "missing object key"))?;
            if bucket.is_empty() || key.is_empty() {
                return Err(invalid(trimmed, "bucket and key must not be empty"));
            }
            format!("https://{bucket}.s3.amazonaws.com/{key}")
        } else if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            trimmed.to_string()
        } else {
            return Err(invalid(trimmed, "expected an s3:// or https:// location"));
        };

        let format = format_from_path(trimmed)?;
        Ok(Self {
            original: trimmed.to_string(),
            url,
            format,
        })
    }
}

fn format_from_path(location: &str) -> Result<ObjectFormat> {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(ObjectFormat::Csv),
        "json" => Ok(ObjectFormat::Json),
        _ => Err(IngestError::UnsupportedFileType {
            location: location.to_string(),
            extension,
        }),
    }
}

fn invalid(location: &str, reason: &str) -> IngestError {
    IngestError::InvalidLocation {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

/// A CSV or JSON object in object storage.
#[derive(Debug, Clone)]
pub struct ObjectStorageSource {
    location: ObjectLocation,
    client: HttpClient,
}

impl ObjectStorageSource {
    pub fn new(location: &str) -> Result<Self> {
        Self::with_timeout(location, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(location: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            location: ObjectLocation::parse(location)?,
            client: HttpClient::new(timeout)?,
        })
    }

    pub fn location(&self) -> &ObjectLocation {
        &self.location
    }
}

impl SourceAdapter for ObjectStorageSource {
    fn describe(&self) -> String {
        self.location.original.clone()
    }

    fn fetch(&self) -> Result<DataFrame> {
        let bytes = self.client.get_bytes(&self.location.url, &[])?;
        tracing::debug!(
            url = %self.location.url,
            format = self.location.format.as_str(),
            bytes = bytes.len(),
            "downloaded object"
        );
        match self.location.format {
            ObjectFormat::Csv => read_csv_bytes(&self.location.original, bytes),
            ObjectFormat::Json => frame_from_json(&self.location.original, &bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_uri_becomes_https() {
        let location = ObjectLocation::parse("s3://data-handling-public/products.csv").unwrap();
        assert_eq!(
            location.url,
            "https://data-handling-public.s3.amazonaws.com/products.csv"
        );
        assert_eq!(location.format, ObjectFormat::Csv);
    }

    #[test]
    fn https_url_kept() {
        let url = "https://data-handling-public.s3.eu-west-1.amazonaws.com/date_details.json";
        let location = ObjectLocation::parse(url).unwrap();
        assert_eq!(location.url, url);
        assert_eq!(location.format, ObjectFormat::Json);
    }

    #[test]
    fn extension_ignores_query_and_case() {
        let location = ObjectLocation::parse("https://host/data/Products.CSV?versionId=3").unwrap();
        assert_eq!(location.format, ObjectFormat::Csv);
    }

    #[test]
    fn rejects_other_types_and_schemes() {
        assert!(matches!(
            ObjectLocation::parse("s3://bucket/card_details.pdf"),
            Err(IngestError::UnsupportedFileType { extension, .. }) if extension == "pdf"
        ));
        assert!(matches!(
            ObjectLocation::parse("s3://bucket"),
            Err(IngestError::InvalidLocation { .. })
        ));
        assert!(matches!(
            ObjectLocation::parse("ftp://host/file.csv"),
            Err(IngestError::InvalidLocation { .. })
        ));
    }
}
