//! Upload and read-back against an on-disk SQLite database.

use chrono::NaiveDate;
use polars::prelude::*;
use retail_db::{DatabaseConfig, DatabaseConnector, DatabaseTable, DbError};
use retail_ingest::{IngestError, SourceAdapter};

fn temp_config(dir: &tempfile::TempDir) -> DatabaseConfig {
    DatabaseConfig::sqlite(dir.path().join("sales.db"))
}

fn sample_frame() -> DataFrame {
    df! {
        "store_code" => ["WEB-1388012W", "BA-0001"],
        "staff_numbers" => [325i64, 34],
        "latitude" => [None, Some(51.4f64)],
    }
    .unwrap()
}

#[test]
fn upload_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);
    let mut db = DatabaseConnector::open(&config).unwrap();

    let written = db.upload(&sample_frame(), "dim_store_details").unwrap();
    assert_eq!(written, 2);
    assert_eq!(db.list_tables().unwrap(), vec!["dim_store_details"]);

    let back = db.read_table("dim_store_details").unwrap();
    assert_eq!(back.shape(), (2, 3));
    let staff = back.column("staff_numbers").unwrap();
    assert_eq!(staff.dtype(), &DataType::Int64);
    assert_eq!(staff.get(0).unwrap(), AnyValue::Int64(325));
    let latitude = back.column("latitude").unwrap();
    assert!(latitude.get(0).unwrap().is_null());
}

#[test]
fn upload_replaces_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = DatabaseConnector::open(&temp_config(&dir)).unwrap();

    db.upload(&sample_frame(), "dim_store_details").unwrap();
    let smaller = df! { "store_code" => ["WEB-1388012W"] }.unwrap();
    db.upload(&smaller, "dim_store_details").unwrap();

    let back = db.read_table("dim_store_details").unwrap();
    assert_eq!(back.shape(), (1, 1));
}

#[test]
fn legacy_index_column_is_dropped_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = DatabaseConnector::open(&temp_config(&dir)).unwrap();
    let frame = df! {
        "index" => [0i64, 1],
        "first_name" => ["Sigfried", "Guy"],
    }
    .unwrap();
    db.upload(&frame, "legacy_users").unwrap();

    let back = db.read_table("legacy_users").unwrap();
    assert!(back.column("index").is_err());
    assert_eq!(back.width(), 1);
}

#[test]
fn dates_are_stored_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = DatabaseConnector::open(&temp_config(&dir)).unwrap();
    let dates = vec![
        NaiveDate::from_ymd_opt(2016, 3, 25),
        NaiveDate::from_ymd_opt(2018, 10, 21),
    ];
    let frame = DataFrame::new(vec![Series::new("join_date".into(), dates).into()]).unwrap();
    db.upload(&frame, "dim_users").unwrap();

    let back = db.read_table("dim_users").unwrap();
    let dates = back.column("join_date").unwrap();
    assert_eq!(dates.dtype(), &DataType::String);
    assert_eq!(dates.get(0).unwrap(), AnyValue::String("2016-03-25"));
}

#[test]
fn table_source_reports_missing_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);
    DatabaseConnector::open(&config).unwrap();

    let source = DatabaseTable::new(config, "orders_table");
    assert!(source.describe().ends_with(":orders_table"));
    assert!(matches!(
        source.fetch(),
        Err(IngestError::Database { table, .. }) if table == "orders_table"
    ));
}

#[test]
fn table_source_does_not_create_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);

    let source = DatabaseTable::new(config.clone(), "legacy_users");
    let err = source.fetch().unwrap_err();
    assert!(matches!(&err, IngestError::Database { table, .. } if table == "legacy_users"));
    assert!(err.to_string().contains("failed to open database"), "{err}");
    assert!(!dir.path().join("sales.db").exists());
    assert!(matches!(
        DatabaseConnector::open_read_only(&config),
        Err(DbError::Open { .. })
    ));
}

#[test]
fn read_only_connector_rejects_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);
    DatabaseConnector::open(&config)
        .unwrap()
        .upload(&sample_frame(), "dim_store_details")
        .unwrap();

    let mut db = DatabaseConnector::open_read_only(&config).unwrap();
    assert!(matches!(
        db.upload(&sample_frame(), "dim_store_details"),
        Err(DbError::Sql(_))
    ));
    assert_eq!(db.read_table("dim_store_details").unwrap().height(), 2);
}

#[test]
fn upload_rejects_frame_without_columns() {
    let mut db = DatabaseConnector::open_in_memory().unwrap();
    assert!(matches!(
        db.upload(&DataFrame::empty(), "dim_users"),
        Err(DbError::NoColumns { .. })
    ));
}
