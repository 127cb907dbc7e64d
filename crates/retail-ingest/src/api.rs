//! Store details REST API.
//!
//! The API exposes a store count endpoint and one details endpoint per
//! store number. Stores are fetched one by one; a store that fails to load
//! is logged and skipped.

use std::time::Duration;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IngestError, Result};
use crate::http::{DEFAULT_TIMEOUT, HttpClient};
use crate::json::records_to_frame;
use crate::source::SourceAdapter;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Field of the count response holding the number of stores.
const STORE_COUNT_FIELD: &str = "number_stores";

/// Connection settings for the store API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_number_of_stores_path")]
    pub number_of_stores_path: String,
    #[serde(default = "default_store_details_path")]
    pub store_details_path: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_number_of_stores_path() -> String {
    "/number_stores".to_string()
}

fn default_store_details_path() -> String {
    "/store_details/".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            number_of_stores_path: default_number_of_stores_path(),
            store_details_path: default_store_details_path(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn number_of_stores_url(&self) -> String {
        join_url(&self.base_url, &self.number_of_stores_path)
    }

    pub fn store_details_url(&self, store_number: u32) -> String {
        format!(
            "{}{store_number}",
            join_url(&self.base_url, &self.store_details_path)
        )
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Client for the store details API.
#[derive(Debug, Clone)]
pub struct StoreApi {
    config: ApiConfig,
    client: HttpClient,
}

impl StoreApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = HttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, client })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        self.config
            .api_key
            .as_deref()
            .map(|key| vec![(API_KEY_HEADER, key)])
            .unwrap_or_default()
    }

    /// Number of stores reported by the API.
    pub fn number_of_stores(&self) -> Result<u32> {
        let url = self.config.number_of_stores_url();
        let body = self.client.get_json(&url, &self.headers())?;
        let count = parse_store_count(&url, &body)?;
        tracing::info!(count, "store count retrieved");
        Ok(count)
    }

    /// Details of one store as a JSON object.
    pub fn store_details(&self, store_number: u32) -> Result<Map<String, Value>> {
        let url = self.config.store_details_url(store_number);
        match self.client.get_json(&url, &self.headers())? {
            Value::Object(map) => Ok(map),
            _ => Err(IngestError::JsonShape {
                source_name: url,
                reason: "store details are not an object".to_string(),
            }),
        }
    }

    /// Fetches every store and combines them into one frame.
    pub fn retrieve_stores(&self) -> Result<DataFrame> {
        let count = self.number_of_stores()?;
        let mut records = Vec::with_capacity(count as usize);
        let mut failed = 0usize;
        for store_number in 0..count {
            match self.store_details(store_number) {
                Ok(record) => records.push(record),
                Err(error) => {
                    failed += 1;
                    tracing::warn!(store_number, %error, "skipping store");
                }
            }
        }

        if records.is_empty() {
            return Err(IngestError::EmptySource {
                source_name: self.config.base_url.clone(),
            });
        }
        if failed > 0 {
            tracing::warn!(failed, fetched = records.len(), "some stores could not be fetched");
        }
        records_to_frame(&records)
    }
}

impl SourceAdapter for StoreApi {
    fn describe(&self) -> String {
        format!("API {}", self.config.base_url)
    }

    fn fetch(&self) -> Result<DataFrame> {
        self.retrieve_stores()
    }
}

/// Reads the store count from the count endpoint's response body.
pub fn parse_store_count(source_name: &str, body: &Value) -> Result<u32> {
    body.get(STORE_COUNT_FIELD)
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(|| IngestError::JsonShape {
            source_name: source_name.to_string(),
            reason: format!("missing integer field '{STORE_COUNT_FIELD}'"),
        })
}
