//! Where a database lives, tagged by engine.
//!
//! ```toml
//! [source_database]
//! engine = "postgres"
//! host = "db.internal"
//! user = "etl"
//! database = "sales_data"
//!
//! [target_database]
//! engine = "sqlite"
//! path = "sales_data.db"
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Port used when a Postgres config leaves it out.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// A database location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum DatabaseConfig {
    /// A single database file.
    Sqlite { path: PathBuf },
    /// A Postgres server; requires the `postgres` feature.
    Postgres(PostgresConfig),
}

impl DatabaseConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::Sqlite { path: path.into() }
    }

    pub fn engine(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Postgres(_) => "postgres",
        }
    }

    /// The file path, for SQLite configs.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Sqlite { path } => Some(path),
            Self::Postgres(_) => None,
        }
    }

    /// Location for logs and error messages. Never includes the password.
    pub fn describe(&self) -> String {
        match self {
            Self::Sqlite { path } => path.display().to_string(),
            Self::Postgres(pg) => pg.describe(),
        }
    }
}

/// Connection settings for a Postgres server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostgresConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    /// Usually supplied through the environment rather than the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub database: String,
}

fn default_port() -> u16 {
    DEFAULT_POSTGRES_PORT
}

impl PostgresConfig {
    /// Connection URL in the `postgresql://` form libpq accepts.
    pub fn url(&self) -> String {
        let mut url = format!("postgresql://{}", encode_component(&self.user));
        if let Some(password) = &self.password {
            let _ = write!(url, ":{}", encode_component(password));
        }
        let _ = write!(
            url,
            "@{}:{}/{}",
            self.host,
            self.port,
            encode_component(&self.database)
        );
        url
    }

    pub fn describe(&self) -> String {
        format!(
            "postgresql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

/// Percent-encode everything outside the URL unreserved set.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}
