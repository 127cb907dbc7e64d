//! A database table as a source adapter.

use polars::prelude::DataFrame;
use retail_ingest::{IngestError, SourceAdapter};

use crate::config::DatabaseConfig;
use crate::connector::DatabaseConnector;

/// One table in a database, read in full.
///
/// The database is opened read-only, so fetching never creates or
/// modifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTable {
    config: DatabaseConfig,
    table: String,
}

impl DatabaseTable {
    pub fn new(config: DatabaseConfig, table: impl Into<String>) -> Self {
        Self {
            config,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl SourceAdapter for DatabaseTable {
    fn describe(&self) -> String {
        format!("{}:{}", self.config.describe(), self.table)
    }

    fn fetch(&self) -> retail_ingest::Result<DataFrame> {
        DatabaseConnector::open_read_only(&self.config)
            .and_then(|mut db| db.read_table(&self.table))
            .map_err(|e| IngestError::Database {
                table: self.table.clone(),
                message: e.to_string(),
            })
    }
}
