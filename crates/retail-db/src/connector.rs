//! Engine-independent database connector.
//!
//! Table naming, type mapping and the legacy index column are handled
//! here; each engine module only runs the statements.

use std::fmt;
use std::path::Path;

use polars::prelude::*;
use retail_common::{CellValue, any_to_text};

use crate::config::DatabaseConfig;
use crate::error::{DbError, Result};
use crate::sqlite;

#[cfg(feature = "postgres")]
use crate::postgres;

/// Row-label column left behind by earlier exports; dropped on read.
pub const LEGACY_INDEX_COLUMN: &str = "index";

enum Backend {
    Sqlite(rusqlite::Connection),
    #[cfg(feature = "postgres")]
    Postgres(diesel::PgConnection),
}

/// An open database connection.
pub struct DatabaseConnector {
    backend: Backend,
    label: String,
}

impl fmt::Debug for DatabaseConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConnector")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl DatabaseConnector {
    /// Open the database described by `config` for reading and writing.
    ///
    /// A SQLite file is created if it does not exist.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::connect(config, false)
    }

    /// Open an existing database without write access.
    ///
    /// A missing SQLite file is an error rather than a new empty database.
    pub fn open_read_only(config: &DatabaseConfig) -> Result<Self> {
        Self::connect(config, true)
    }

    fn connect(config: &DatabaseConfig, read_only: bool) -> Result<Self> {
        let backend = match config {
            DatabaseConfig::Sqlite { path } => Backend::Sqlite(sqlite::open(path, read_only)?),
            #[cfg(feature = "postgres")]
            DatabaseConfig::Postgres(pg) => Backend::Postgres(postgres::connect(pg, read_only)?),
            #[cfg(not(feature = "postgres"))]
            DatabaseConfig::Postgres(_) => {
                return Err(DbError::EngineUnavailable { engine: "postgres" });
            }
        };
        let label = config.describe();
        tracing::debug!(database = %label, engine = config.engine(), read_only, "opened database");
        Ok(Self { backend, label })
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&DatabaseConfig::sqlite(path))
    }

    /// A private in-memory SQLite database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            backend: Backend::Sqlite(rusqlite::Connection::open_in_memory()?),
            label: ":memory:".to_string(),
        })
    }

    /// Location used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Names of all user tables, sorted.
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        match &mut self.backend {
            Backend::Sqlite(conn) => sqlite::list_tables(conn),
            #[cfg(feature = "postgres")]
            Backend::Postgres(conn) => postgres::list_tables(conn),
        }
    }

    pub fn table_exists(&mut self, table: &str) -> Result<bool> {
        Ok(self.list_tables()?.iter().any(|name| name == table))
    }

    /// Read a whole table. A legacy `index` column is dropped.
    pub fn read_table(&mut self, table: &str) -> Result<DataFrame> {
        let quoted = quote_identifier(table)?;
        if !self.table_exists(table)? {
            return Err(DbError::TableNotFound {
                table: table.to_string(),
            });
        }

        let mut df = match &mut self.backend {
            Backend::Sqlite(conn) => sqlite::read_table(conn, &quoted)?,
            #[cfg(feature = "postgres")]
            Backend::Postgres(conn) => postgres::read_table(conn, table, &quoted)?,
        };
        if df.column(LEGACY_INDEX_COLUMN).is_ok() {
            df.drop_in_place(LEGACY_INDEX_COLUMN)?;
        }
        tracing::info!(
            database = %self.label,
            table,
            rows = df.height(),
            columns = df.width(),
            "read table"
        );
        Ok(df)
    }

    /// Replace `table` with the contents of `df`; returns the rows written.
    ///
    /// The drop, create and inserts run in one transaction, so a failed
    /// upload leaves the previous table in place.
    pub fn upload(&mut self, df: &DataFrame, table: &str) -> Result<usize> {
        let quoted = quote_identifier(table)?;
        if df.width() == 0 {
            return Err(DbError::NoColumns {
                table: table.to_string(),
            });
        }
        let columns = column_specs(df)?;

        match &mut self.backend {
            Backend::Sqlite(conn) => sqlite::replace_table(conn, &quoted, &columns, df)?,
            #[cfg(feature = "postgres")]
            Backend::Postgres(conn) => postgres::replace_table(conn, &quoted, &columns, df)?,
        }

        tracing::info!(database = %self.label, table, rows = df.height(), "uploaded table");
        Ok(df.height())
    }
}

/// Storage class of an uploaded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Integer,
    Real,
    Text,
}

impl ColumnKind {
    pub(crate) fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Integer,
            DataType::Float32 | DataType::Float64 => Self::Real,
            _ => Self::Text,
        }
    }
}

/// A quoted column name and its storage class.
#[derive(Debug, Clone)]
pub(crate) struct ColumnSpec {
    pub(crate) quoted: String,
    pub(crate) kind: ColumnKind,
}

fn column_specs(df: &DataFrame) -> Result<Vec<ColumnSpec>> {
    df.get_columns()
        .iter()
        .map(|column| {
            Ok(ColumnSpec {
                quoted: quote_identifier(column.name().as_str())?,
                kind: ColumnKind::of(column.dtype()),
            })
        })
        .collect()
}

/// Values of row `idx`, one per column, ready to bind.
pub(crate) fn row_cells(df: &DataFrame, idx: usize) -> Result<Vec<CellValue>> {
    df.get_columns()
        .iter()
        .map(|column| Ok(to_cell(column.get(idx)?)))
        .collect()
}

pub(crate) fn quote_identifier(name: &str) -> Result<String> {
    if name.trim().is_empty() || name.contains('\0') {
        return Err(DbError::InvalidTableName {
            table: name.to_string(),
        });
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Booleans become 0/1; dates, times and anything else non-numeric become text.
fn to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Int(i64::from(b)),
        AnyValue::Int8(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int16(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int32(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int64(v) => CellValue::Int(v),
        AnyValue::UInt8(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int),
        AnyValue::Float32(v) => CellValue::Float(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Float(v),
        other => any_to_text(other).map_or(CellValue::Null, CellValue::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("dim_users").unwrap(), "\"dim_users\"");
        assert_eq!(quote_identifier("a\"b").unwrap(), "\"a\"\"b\"");
        assert!(quote_identifier("  ").is_err());
    }

    #[test]
    fn maps_dtypes_to_kinds() {
        assert_eq!(ColumnKind::of(&DataType::Boolean), ColumnKind::Integer);
        assert_eq!(ColumnKind::of(&DataType::Int64), ColumnKind::Integer);
        assert_eq!(ColumnKind::of(&DataType::Float64), ColumnKind::Real);
        assert_eq!(ColumnKind::of(&DataType::String), ColumnKind::Text);
        assert_eq!(ColumnKind::of(&DataType::Date), ColumnKind::Text);
    }

    #[test]
    fn cells_follow_column_values() {
        assert_eq!(to_cell(AnyValue::Boolean(true)), CellValue::Int(1));
        assert_eq!(to_cell(AnyValue::UInt64(u64::MAX)), CellValue::Float(u64::MAX as f64));
        assert_eq!(to_cell(AnyValue::Null), CellValue::Null);
        assert_eq!(
            to_cell(AnyValue::String("GB")),
            CellValue::Text("GB".to_string())
        );
    }

    #[test]
    fn empty_database_has_no_tables() {
        let mut db = DatabaseConnector::open_in_memory().unwrap();
        assert!(db.list_tables().unwrap().is_empty());
        assert!(matches!(
            db.read_table("legacy_users"),
            Err(DbError::TableNotFound { .. })
        ));
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn postgres_needs_the_feature() {
        let config = DatabaseConfig::Postgres(crate::PostgresConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "etl".to_string(),
            password: None,
            database: "sales_data".to_string(),
        });
        assert!(matches!(
            DatabaseConnector::open(&config),
            Err(DbError::EngineUnavailable { engine: "postgres" })
        ));
    }
}
