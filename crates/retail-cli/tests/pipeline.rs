//! Integration tests for single-entity processing.

use std::io::Write;

use retail_cli::config::PipelineConfig;
use retail_cli::pipeline::{process_entity, source_for};
use retail_cli::types::EntityStatus;
use retail_db::DatabaseConnector;
use retail_ingest::FileSource;
use retail_model::{CleaningOptions, Entity};

const DATE_DETAILS: &str = r#"{
    "timestamp": {"0": "22:00:06", "1": "NULL", "2": "09:00:00"},
    "month": {"0": "9", "1": "1", "2": "2"},
    "year": {"0": "2012", "1": "1997", "2": "2019"},
    "day": {"0": "19", "1": "2", "2": "3"},
    "time_period": {"0": "Evening", "1": "Morning", "2": "Morning"},
    "date_uuid": {
        "0": "3b7ca996-37f9-433f-b6d0-ce8391b615ad",
        "1": "adc86836-6c35-49ca-bb0d-65b6507a00fa",
        "2": "5ff791bf-d7e1-4e4f-ba48-6b7e2a7bdf32"
    }
}"#;

fn json_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn date_times_are_cleaned_and_uploaded() {
    let file = json_file(DATE_DETAILS);
    let source = FileSource::new(file.path());
    let mut db = DatabaseConnector::open_in_memory().unwrap();

    let report = process_entity(
        Entity::DateTimes,
        &source,
        "dim_date_times",
        &CleaningOptions::default(),
        Some(&mut db),
    );

    assert_eq!(report.rows_in, Some(3));
    assert_eq!(report.rows_out, Some(2));
    assert_eq!(report.status, EntityStatus::Loaded(2));
    let stored = db.read_table("dim_date_times").unwrap();
    assert_eq!(stored.height(), 2);
    assert_eq!(stored.width(), 6);
}

#[test]
fn dry_run_does_not_upload() {
    let file = json_file(DATE_DETAILS);
    let source = FileSource::new(file.path());

    let report = process_entity(
        Entity::DateTimes,
        &source,
        "dim_date_times",
        &CleaningOptions::default(),
        None,
    );

    assert_eq!(report.status, EntityStatus::DryRun);
    assert_eq!(report.rows_out, Some(2));
}

#[test]
fn structural_error_is_reported_not_raised() {
    let file = json_file(r#"[{"first_name": "Sigfried"}]"#);
    let source = FileSource::new(file.path());

    let report = process_entity(
        Entity::Users,
        &source,
        "dim_users",
        &CleaningOptions::default(),
        None,
    );

    assert_eq!(report.rows_in, Some(1));
    assert_eq!(report.rows_out, None);
    match report.status {
        EntityStatus::Failed(message) => assert!(message.contains("country_code"), "{message}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn missing_source_file_is_reported() {
    let source = FileSource::new("does-not-exist.csv");
    let report = process_entity(
        Entity::Products,
        &source,
        "dim_products",
        &CleaningOptions::default(),
        None,
    );
    assert!(report.status.is_failure());
    assert_eq!(report.rows_in, None);
}

#[test]
fn sources_need_their_locations() {
    let config = PipelineConfig::default();
    assert!(source_for(Entity::Products, &config).is_err());
    assert!(source_for(Entity::Stores, &config).is_err());
    let users = source_for(Entity::Users, &config).unwrap();
    assert_eq!(users.describe(), "legacy.db:legacy_users");
}
