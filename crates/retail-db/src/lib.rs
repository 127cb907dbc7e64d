//! Relational store access for the retail ETL.
//!
//! A [`DatabaseConnector`] is built from a [`DatabaseConfig`] and offers
//! the three operations the pipeline needs: list tables, read a table into
//! a DataFrame, and upload a DataFrame as a table, replacing any existing
//! table with that name. [`DatabaseTable`] exposes one table as a
//! [`SourceAdapter`](retail_ingest::SourceAdapter).
//!
//! SQLite is always available. Postgres is compiled in with the
//! `postgres` feature, which needs libpq at build time.

mod config;
mod connector;
mod error;
#[cfg(feature = "postgres")]
mod postgres;
mod source;
mod sqlite;

pub use config::{DEFAULT_POSTGRES_PORT, DatabaseConfig, PostgresConfig};
pub use connector::{DatabaseConnector, LEGACY_INDEX_COLUMN};
pub use error::{DbError, Result};
pub use source::DatabaseTable;
