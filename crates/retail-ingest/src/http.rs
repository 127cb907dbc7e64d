//! Blocking HTTP client shared by the network adapters.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;

use crate::error::{IngestError, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::Http {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// GET a URL and return the body; non-success statuses are errors.
    pub fn get_bytes(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("retail-etl/", env!("CARGO_PKG_VERSION")));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().map_err(|e| http_error(url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| http_error(url, &e))?;
        tracing::trace!(url, bytes = body.len(), "received response");
        Ok(body.to_vec())
    }

    /// GET a URL and parse the body as JSON.
    pub fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<Value> {
        let body = self.get_bytes(url, headers)?;
        serde_json::from_slice(&body).map_err(|e| IngestError::JsonParse {
            source_name: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn http_error(url: &str, error: &reqwest::Error) -> IngestError {
    IngestError::Http {
        url: url.to_string(),
        message: error.to_string(),
    }
}
