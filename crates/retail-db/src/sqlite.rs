//! SQLite engine.

use std::path::Path;

use polars::prelude::DataFrame;
use retail_common::{CellValue, build_frame};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags};

use crate::connector::{ColumnKind, ColumnSpec, row_cells};
use crate::error::{DbError, Result};

/// Read-only opens never create the file.
pub(crate) fn open(path: &Path, read_only: bool) -> Result<Connection> {
    let opened = if read_only {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    } else {
        Connection::open(path)
    };
    opened.map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

pub(crate) fn read_table(conn: &Connection, quoted: &str) -> Result<DataFrame> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {quoted}"))?;
    let headers: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    let mut result = stmt.query([])?;
    while let Some(row) = result.next()? {
        let mut cells = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            cells.push(from_sql(row.get_ref(idx)?));
        }
        rows.push(cells);
    }
    Ok(build_frame(&headers, rows)?)
}

pub(crate) fn replace_table(
    conn: &mut Connection,
    quoted: &str,
    columns: &[ColumnSpec],
    df: &DataFrame,
) -> Result<()> {
    let definitions = columns
        .iter()
        .map(|c| format!("{} {}", c.quoted, type_name(c.kind)))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {quoted}"), [])?;
    tx.execute(&format!("CREATE TABLE {quoted} ({definitions})"), [])?;
    {
        let mut insert = tx.prepare(&format!("INSERT INTO {quoted} VALUES ({placeholders})"))?;
        for idx in 0..df.height() {
            let values = row_cells(df, idx)?.into_iter().map(to_sql);
            insert.execute(rusqlite::params_from_iter(values))?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn type_name(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Integer => "INTEGER",
        ColumnKind::Real => "REAL",
        ColumnKind::Text => "TEXT",
    }
}

fn from_sql(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Int(v),
        ValueRef::Real(v) => CellValue::Float(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CellValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn to_sql(cell: CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Integer(i64::from(b)),
        CellValue::Int(v) => Value::Integer(v),
        CellValue::Float(v) => Value::Real(v),
        CellValue::Text(s) => Value::Text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(type_name(ColumnKind::Integer), "INTEGER");
        assert_eq!(type_name(ColumnKind::Real), "REAL");
        assert_eq!(type_name(ColumnKind::Text), "TEXT");
    }

    #[test]
    fn read_only_open_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        assert!(matches!(open(&path, true), Err(DbError::Open { .. })));
        assert!(!path.exists());
    }
}
