//! Pipeline configuration loaded from a TOML file.
//!
//! Every section is optional. Databases, sink table names and cleaning
//! options have defaults; source locations and the API base URL do not,
//! and are only required by the entities that use them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use retail_db::DatabaseConfig;
use retail_ingest::ApiConfig;
use retail_model::{CleaningOptions, Entity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "retail-etl.toml";

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "RETAIL_API_KEY";

/// Environment variables that override a Postgres database's password.
pub const SOURCE_PASSWORD_ENV: &str = "RETAIL_SOURCE_DB_PASSWORD";
pub const TARGET_PASSWORD_ENV: &str = "RETAIL_TARGET_DB_PASSWORD";

const DEFAULT_SOURCE_DATABASE: &str = "legacy.db";
const DEFAULT_TARGET_DATABASE: &str = "sales_data.db";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing setting `{key}` required for {entity}")]
    Missing { key: &'static str, entity: Entity },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Legacy store holding the users and orders tables.
    pub source_database: DatabaseConfig,
    /// Store receiving the cleaned tables.
    pub target_database: DatabaseConfig,
    pub api: Option<ApiConfig>,
    pub sources: SourcesConfig,
    pub cleaning: CleaningOptions,
    pub tables: TablesConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_database: DatabaseConfig::sqlite(DEFAULT_SOURCE_DATABASE),
            target_database: DatabaseConfig::sqlite(DEFAULT_TARGET_DATABASE),
            api: None,
            sources: SourcesConfig::default(),
            cleaning: CleaningOptions::default(),
            tables: TablesConfig::default(),
        }
    }
}

/// Where each entity's raw data lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub users_table: String,
    pub orders_table: String,
    pub card_details_pdf: Option<String>,
    pub products_csv: Option<String>,
    pub date_details_json: Option<String>,
    /// Request timeout for PDF and object-storage downloads.
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            users_table: "legacy_users".to_string(),
            orders_table: "orders_table".to_string(),
            card_details_pdf: None,
            products_csv: None,
            date_details_json: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourcesConfig {
    /// Source table for entities extracted from the legacy database.
    pub fn table(&self, entity: Entity) -> Option<&str> {
        match entity {
            Entity::Users => Some(&self.users_table),
            Entity::Orders => Some(&self.orders_table),
            _ => None,
        }
    }

    /// Document or object location for entities fetched by URL.
    pub fn location(&self, entity: Entity) -> Result<&str, ConfigError> {
        let (key, value) = match entity {
            Entity::Cards => ("sources.card_details_pdf", &self.card_details_pdf),
            Entity::Products => ("sources.products_csv", &self.products_csv),
            Entity::DateTimes => ("sources.date_details_json", &self.date_details_json),
            _ => return Err(ConfigError::Missing { key: "sources", entity }),
        };
        value
            .as_deref()
            .ok_or(ConfigError::Missing { key, entity })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sink table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub users: String,
    pub cards: String,
    pub stores: String,
    pub products: String,
    pub orders: String,
    pub date_times: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            users: Entity::Users.default_table().to_string(),
            cards: Entity::Cards.default_table().to_string(),
            stores: Entity::Stores.default_table().to_string(),
            products: Entity::Products.default_table().to_string(),
            orders: Entity::Orders.default_table().to_string(),
            date_times: Entity::DateTimes.default_table().to_string(),
        }
    }
}

impl TablesConfig {
    pub fn table_for(&self, entity: Entity) -> &str {
        match entity {
            Entity::Users => &self.users,
            Entity::Cards => &self.cards,
            Entity::Stores => &self.stores,
            Entity::Products => &self.products,
            Entity::Orders => &self.orders,
            Entity::DateTimes => &self.date_times,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(path, &text)?;
        config.apply_env(|key| std::env::var(key).ok());
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load the explicit config, or the default file when it exists.
    ///
    /// Without either, the built-in defaults are used.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::load(default_path);
        }
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let (Some(key), Some(api)) = (lookup(API_KEY_ENV), self.api.as_mut()) {
            api.api_key = Some(key);
        }
        for (name, database) in [
            (SOURCE_PASSWORD_ENV, &mut self.source_database),
            (TARGET_PASSWORD_ENV, &mut self.target_database),
        ] {
            if let (Some(password), DatabaseConfig::Postgres(pg)) = (lookup(name), database) {
                pg.password = Some(password);
            }
        }
    }

    pub fn require_api(&self) -> Result<&ApiConfig, ConfigError> {
        self.api.as_ref().ok_or(ConfigError::Missing {
            key: "api.base_url",
            entity: Entity::Stores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = PipelineConfig::from_toml_str(Path::new("t.toml"), "").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.tables.table_for(Entity::Cards), "dim_card_details");
        assert_eq!(config.sources.table(Entity::Users), Some("legacy_users"));
        assert!(!config.cleaning.enforce_card_length);
    }

    #[test]
    fn missing_location_names_the_key() {
        let config = PipelineConfig::default();
        let err = config.sources.location(Entity::Products).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing setting `sources.products_csv` required for products"
        );
        assert!(config.require_api().is_err());
    }

    #[test]
    fn env_key_overrides_file_key() {
        let text = r#"
            [api]
            base_url = "https://api.example.com/prod"
            api_key = "from-file"
        "#;
        let mut config = PipelineConfig::from_toml_str(Path::new("t.toml"), text).unwrap();
        config.apply_env(|key| (key == API_KEY_ENV).then(|| "from-env".to_string()));
        assert_eq!(config.require_api().unwrap().api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn postgres_source_takes_password_from_env() {
        let text = r#"
            [source_database]
            engine = "postgres"
            host = "db.internal"
            user = "etl"
            database = "legacy"
        "#;
        let mut config = PipelineConfig::from_toml_str(Path::new("t.toml"), text).unwrap();
        config.apply_env(|key| (key == SOURCE_PASSWORD_ENV).then(|| "secret".to_string()));
        let DatabaseConfig::Postgres(pg) = &config.source_database else {
            panic!("expected postgres, got {:?}", config.source_database);
        };
        assert_eq!(pg.port, 5432);
        assert_eq!(pg.password.as_deref(), Some("secret"));
        assert_eq!(config.target_database, DatabaseConfig::sqlite("sales_data.db"));
    }

    #[test]
    fn database_needs_an_engine() {
        let err = PipelineConfig::from_toml_str(
            Path::new("t.toml"),
            "[source_database]\npath = \"legacy.db\"\n",
        );
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PipelineConfig::from_toml_str(Path::new("t.toml"), "[tables]\nuser = \"x\"\n");
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }
}
