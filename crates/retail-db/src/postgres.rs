//! Postgres engine using Diesel.
//!
//! Rows are read back as `row_to_json` text so every column type arrives
//! through the same JSON inference the API sources use.

use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Double, Nullable, Text};
use polars::prelude::DataFrame;
use retail_common::{CellValue, build_frame};
use serde_json::{Map, Value};

use crate::config::PostgresConfig;
use crate::connector::{ColumnKind, ColumnSpec, row_cells};
use crate::error::{DbError, Result};

type InsertQuery<'f> = BoxedSqlQuery<'f, Pg, SqlQuery>;

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Text)]
    row: String,
}

pub(crate) fn connect(config: &PostgresConfig, read_only: bool) -> Result<PgConnection> {
    let mut conn =
        PgConnection::establish(&config.url()).map_err(|source| DbError::Connect {
            target: config.describe(),
            message: source.to_string(),
        })?;
    if read_only {
        sql_query("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY").execute(&mut conn)?;
    }
    Ok(conn)
}

pub(crate) fn list_tables(conn: &mut PgConnection) -> Result<Vec<String>> {
    let rows = sql_query(
        "SELECT table_name::text AS name FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
    )
    .load::<NameRow>(conn)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

fn column_names(conn: &mut PgConnection, table: &str) -> Result<Vec<String>> {
    let rows = sql_query(
        "SELECT column_name::text AS name FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind::<Text, _>(table)
    .load::<NameRow>(conn)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

pub(crate) fn read_table(conn: &mut PgConnection, table: &str, quoted: &str) -> Result<DataFrame> {
    let rows = sql_query(format!("SELECT row_to_json(t)::text AS row FROM {quoted} AS t"))
        .load::<JsonRow>(conn)?;
    if rows.is_empty() {
        let headers = column_names(conn, table)?;
        return Ok(build_frame(&headers, Vec::new())?);
    }

    let decode = |message: String| DbError::Decode {
        table: table.to_string(),
        message,
    };
    let mut records: Vec<Map<String, Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(serde_json::from_str(&row.row).map_err(|e| decode(e.to_string()))?);
    }
    retail_ingest::records_to_frame(&records).map_err(|e| decode(e.to_string()))
}

pub(crate) fn replace_table(
    conn: &mut PgConnection,
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
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let insert = format!("INSERT INTO {quoted} VALUES ({placeholders})");

    conn.transaction::<_, DbError, _>(|tx| {
        sql_query(format!("DROP TABLE IF EXISTS {quoted}")).execute(tx)?;
        sql_query(format!("CREATE TABLE {quoted} ({definitions})")).execute(tx)?;
        for idx in 0..df.height() {
            let mut query: InsertQuery<'_> = sql_query(insert.as_str()).into_boxed();
            for (spec, cell) in columns.iter().zip(row_cells(df, idx)?) {
                query = bind_cell(query, spec.kind, cell);
            }
            query.execute(tx)?;
        }
        Ok(())
    })
}

fn type_name(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Integer => "BIGINT",
        ColumnKind::Real => "DOUBLE PRECISION",
        ColumnKind::Text => "TEXT",
    }
}

/// Nulls take the column's type; values bind with their own.
fn bind_cell(query: InsertQuery<'_>, kind: ColumnKind, cell: CellValue) -> InsertQuery<'_> {
    match cell {
        CellValue::Bool(b) => query.bind::<Nullable<BigInt>, _>(Some(i64::from(b))),
        CellValue::Int(v) => query.bind::<Nullable<BigInt>, _>(Some(v)),
        CellValue::Float(v) => query.bind::<Nullable<Double>, _>(Some(v)),
        CellValue::Text(s) => query.bind::<Nullable<Text>, _>(Some(s)),
        CellValue::Null => match kind {
            ColumnKind::Integer => query.bind::<Nullable<BigInt>, _>(None::<i64>),
            ColumnKind::Real => query.bind::<Nullable<Double>, _>(None::<f64>),
            ColumnKind::Text => query.bind::<Nullable<Text>, _>(None::<String>),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(type_name(ColumnKind::Integer), "BIGINT");
        assert_eq!(type_name(ColumnKind::Real), "DOUBLE PRECISION");
        assert_eq!(type_name(ColumnKind::Text), "TEXT");
    }

    #[test]
    fn unreachable_server_is_a_connect_error() {
        let config = PostgresConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "etl".to_string(),
            password: None,
            database: "sales_data".to_string(),
        };
        let err = connect(&config, true).unwrap_err();
        assert!(matches!(err, DbError::Connect { .. }), "{err}");
        assert!(err.to_string().contains("postgresql://etl@127.0.0.1:1/sales_data"));
    }
}
