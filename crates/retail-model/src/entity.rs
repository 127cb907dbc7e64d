//! Business entities handled by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an entity's raw data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// A table in the legacy relational store.
    Database,
    /// A PDF document of tabular pages.
    Pdf,
    /// The store-details REST API.
    Api,
    /// A CSV or JSON object in object storage.
    ObjectStorage,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Database => "database",
            SourceKind::Pdf => "pdf",
            SourceKind::Api => "api",
            SourceKind::ObjectStorage => "object-storage",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A business entity with its own cleaning pipeline.
///
/// The declaration order is also the load order used by a full run: the
/// dimension tables first, then the orders fact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Users,
    Cards,
    Stores,
    Products,
    DateTimes,
    Orders,
}

impl Entity {
    /// All entities in load order.
    pub const ALL: [Entity; 6] = [
        Entity::Users,
        Entity::Cards,
        Entity::Stores,
        Entity::Products,
        Entity::DateTimes,
        Entity::Orders,
    ];

    /// Returns the canonical identifier used on the command line and in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Cards => "cards",
            Entity::Stores => "stores",
            Entity::Products => "products",
            Entity::DateTimes => "date_times",
            Entity::Orders => "orders",
        }
    }

    /// Human-readable description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Entity::Users => "Customer accounts",
            Entity::Cards => "Payment card details",
            Entity::Stores => "Store locations and metadata",
            Entity::Products => "Product catalogue",
            Entity::DateTimes => "Sale date and time details",
            Entity::Orders => "Orders fact table",
        }
    }

    /// The default sink table name for the cleaned data.
    pub fn default_table(&self) -> &'static str {
        match self {
            Entity::Users => "dim_users",
            Entity::Cards => "dim_card_details",
            Entity::Stores => "dim_store_details",
            Entity::Products => "dim_products",
            Entity::DateTimes => "dim_date_times",
            Entity::Orders => "orders_table",
        }
    }

    /// The kind of source the raw data is extracted from.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Entity::Users | Entity::Orders => SourceKind::Database,
            Entity::Cards => SourceKind::Pdf,
            Entity::Stores => SourceKind::Api,
            Entity::Products | Entity::DateTimes => SourceKind::ObjectStorage,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    /// Parse an entity name (case-insensitive, `-` and `_` interchangeable).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");

        match normalized.as_str() {
            "users" | "user" => Ok(Entity::Users),
            "cards" | "card" | "card_details" => Ok(Entity::Cards),
            "stores" | "store" | "store_details" => Ok(Entity::Stores),
            "products" | "product" => Ok(Entity::Products),
            "date_times" | "datetimes" | "date_details" => Ok(Entity::DateTimes),
            "orders" | "order" => Ok(Entity::Orders),
            _ => Err(format!("Unknown entity: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("Users".parse::<Entity>(), Ok(Entity::Users));
        assert_eq!("date-times".parse::<Entity>(), Ok(Entity::DateTimes));
        assert_eq!("card_details".parse::<Entity>(), Ok(Entity::Cards));
        assert!("invoices".parse::<Entity>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for entity in Entity::ALL {
            assert_eq!(entity.to_string().parse::<Entity>(), Ok(entity));
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Entity::DateTimes).unwrap();
        assert_eq!(json, "\"date_times\"");
    }
}
