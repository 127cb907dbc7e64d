//! The fixed cleaning step sequence for each entity.

use retail_model::categories::{
    AVAILABILITY, CARD_PROVIDERS, PRODUCT_CATEGORIES, STORE_COUNTRIES, STORE_TYPES, TIME_PERIODS,
};
use retail_model::{CategorySet, CleaningOptions, Entity};

use crate::types::{CleaningPipeline, CleaningStep, NullPolicy};

/// Placeholder written into the first store row's empty cells.
const FIRST_ROW_PLACEHOLDER: &str = "N/A";

/// Builds the cleaning pipeline for an entity.
pub fn pipeline_for(entity: Entity, options: &CleaningOptions) -> CleaningPipeline {
    match entity {
        Entity::Users => users(),
        Entity::Cards => cards(options),
        Entity::Stores => stores(),
        Entity::Products => products(),
        Entity::Orders => orders(),
        Entity::DateTimes => date_times(),
    }
}

fn users() -> CleaningPipeline {
    CleaningPipeline::new(Entity::Users)
        .step(CleaningStep::DropNulls {
            policy: NullPolicy::All,
        })
        .step(CleaningStep::DropDuplicates)
        .step(CleaningStep::CountryCode {
            column: "country_code".to_string(),
        })
        .step(CleaningStep::Dates {
            columns: columns(&["join_date", "date_of_birth"]),
        })
        .step(CleaningStep::PhoneNumbers {
            column: "phone_number".to_string(),
            country_column: "country_code".to_string(),
        })
        .step(CleaningStep::Uuids {
            columns: columns(&["user_uuid"]),
        })
        .purge()
}

fn cards(options: &CleaningOptions) -> CleaningPipeline {
    CleaningPipeline::new(Entity::Cards)
        .step(categorical("card_provider", CARD_PROVIDERS))
        .step(CleaningStep::CardNumbers {
            column: "card_number".to_string(),
        })
        .step_if(
            options.enforce_card_length,
            CleaningStep::CardNumberLength {
                column: "card_number".to_string(),
                provider_column: "card_provider".to_string(),
            },
        )
        .step(CleaningStep::PaymentDate {
            column: "date_payment_confirmed".to_string(),
        })
        .step(CleaningStep::ExpiryDate {
            column: "expiry_date".to_string(),
        })
        .purge()
}

// The repaired first row keeps null coordinates, so stores only drop duplicates at the end.
fn stores() -> CleaningPipeline {
    CleaningPipeline::new(Entity::Stores)
        .step(CleaningStep::DropColumns {
            columns: columns(&["index", "lat"]),
        })
        .step(CleaningStep::DropDuplicates)
        .step(CleaningStep::RepairFirstRow {
            placeholder: FIRST_ROW_PLACEHOLDER.to_string(),
        })
        .step(categorical("country_code", STORE_COUNTRIES))
        .step(replace("continent", "eeEurope", "Europe"))
        .step(replace("continent", "eeAmerica", "America"))
        .step(CleaningStep::IntegerCoerce {
            column: "staff_numbers".to_string(),
            fallback: Some(0),
            truncate: true,
        })
        .step(CleaningStep::Dates {
            columns: columns(&["opening_date"]),
        })
        .step(CleaningStep::LatLong {
            columns: columns(&["longitude", "latitude"]),
        })
        .step(categorical("store_type", STORE_TYPES))
        .step(CleaningStep::DropDuplicates)
}

fn products() -> CleaningPipeline {
    CleaningPipeline::new(Entity::Products)
        .step(CleaningStep::DropNulls {
            policy: NullPolicy::Any,
        })
        .step(CleaningStep::DropDuplicates)
        .step(CleaningStep::Dates {
            columns: columns(&["date_added"]),
        })
        .step(CleaningStep::Weights {
            column: "weight".to_string(),
        })
        .step(CleaningStep::Uuids {
            columns: columns(&["uuid"]),
        })
        .step(categorical("category", PRODUCT_CATEGORIES))
        .step(CleaningStep::RenameColumn {
            from: "removed".to_string(),
            to: "availabilty".to_string(),
        })
        .step(replace("availabilty", "Still_avaliable", "Still_available"))
        .step(categorical("availabilty", AVAILABILITY))
        .purge()
}

fn orders() -> CleaningPipeline {
    CleaningPipeline::new(Entity::Orders)
        .step(CleaningStep::DropColumns {
            columns: columns(&["level_0", "first_name", "last_name", "1"]),
        })
        .step(CleaningStep::DropDuplicates)
        .step(CleaningStep::DropNulls {
            policy: NullPolicy::Any,
        })
        .step(CleaningStep::IntegerCoerce {
            column: "product_quantity".to_string(),
            fallback: None,
            truncate: false,
        })
        .step(CleaningStep::Uuids {
            columns: columns(&["date_uuid", "user_uuid"]),
        })
        .purge()
}

fn date_times() -> CleaningPipeline {
    CleaningPipeline::new(Entity::DateTimes)
        .step(CleaningStep::DropNulls {
            policy: NullPolicy::Any,
        })
        .step(CleaningStep::DropDuplicates)
        .step(CleaningStep::TimeOfDay {
            column: "timestamp".to_string(),
        })
        .step(categorical("time_period", TIME_PERIODS))
        .step(CleaningStep::Uuids {
            columns: columns(&["date_uuid"]),
        })
        .step(CleaningStep::IntegerStrings {
            columns: columns(&["month", "year", "day"]),
        })
        .purge()
}

impl CleaningPipeline {
    /// Append the final purge: drop rows with any null, then duplicates.
    fn purge(self) -> Self {
        self.step(CleaningStep::DropNulls {
            policy: NullPolicy::Any,
        })
        .step(CleaningStep::DropDuplicates)
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn categorical(column: &str, set: CategorySet) -> CleaningStep {
    CleaningStep::Categorical {
        column: column.to_string(),
        allowed: set.to_vec(),
    }
}

fn replace(column: &str, from: &str, to: &str) -> CleaningStep {
    CleaningStep::ReplaceValue {
        column: column.to_string(),
        from: from.to_string(),
        to: to.to_string(),
    }
}
