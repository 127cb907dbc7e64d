//! Loading the TOML config from disk.

use std::io::Write;
use std::path::Path;

use retail_cli::config::{ConfigError, PipelineConfig};
use retail_model::Entity;

#[test]
fn loads_full_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[source_database]
engine = "sqlite"
path = "legacy.sqlite"

[target_database]
engine = "sqlite"
path = "warehouse.sqlite"

[api]
base_url = "https://api.example.com/prod"
timeout_secs = 10

[sources]
products_csv = "s3://data-handling-public/products.csv"
date_details_json = "https://data-handling-public.s3.eu-west-1.amazonaws.com/date_details.json"

[cleaning]
enforce_card_length = true

[tables]
orders = "orders"
"#
    )
    .unwrap();

    let config = PipelineConfig::load(file.path()).unwrap();

    assert_eq!(config.target_database.path(), Some(Path::new("warehouse.sqlite")));
    let api = config.require_api().unwrap();
    assert_eq!(api.timeout_secs, 10);
    assert_eq!(api.number_of_stores_url(), "https://api.example.com/prod/number_stores");
    assert!(config.cleaning.enforce_card_length);
    assert_eq!(config.tables.table_for(Entity::Orders), "orders");
    assert_eq!(config.tables.table_for(Entity::Users), "dim_users");
    assert_eq!(
        config.sources.location(Entity::Products).unwrap(),
        "s3://data-handling-public/products.csv"
    );
    assert!(config.sources.location(Entity::Cards).is_err());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PipelineConfig::discover(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
