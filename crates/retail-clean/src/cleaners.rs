//! Entity cleaners.
//!
//! Each `clean_*` function runs the default pipeline for its entity and
//! returns only the cleaned frame. [`clean_entity`] accepts options and
//! returns the full [`CleanOutcome`].

use polars::prelude::DataFrame;
use retail_model::{CleaningOptions, Entity};

use crate::error::Result;
use crate::executor::{CleanOutcome, execute_pipeline};
use crate::pipelines::pipeline_for;

/// Clean an entity's frame with the given options.
pub fn clean_entity(
    entity: Entity,
    df: DataFrame,
    options: &CleaningOptions,
) -> Result<CleanOutcome> {
    let pipeline = pipeline_for(entity, options);
    execute_pipeline(df, &pipeline)
}

fn clean_default(entity: Entity, df: DataFrame) -> Result<DataFrame> {
    Ok(clean_entity(entity, df, &CleaningOptions::default())?.frame)
}

/// Clean user records: country codes, dates, phone numbers and UUIDs.
pub fn clean_users(df: DataFrame) -> Result<DataFrame> {
    clean_default(Entity::Users, df)
}

/// Clean card details: providers, card numbers, payment and expiry dates.
pub fn clean_cards(df: DataFrame) -> Result<DataFrame> {
    clean_default(Entity::Cards, df)
}

/// Clean store details: countries, continents, staff counts, dates, coordinates.
pub fn clean_stores(df: DataFrame) -> Result<DataFrame> {
    clean_default(Entity::Stores, df)
}

pub fn clean_products(df: DataFrame) -> Result<DataFrame> {
    clean_default(Entity::Products, df)
}

pub fn clean_orders(df: DataFrame) -> Result<DataFrame> {
    clean_default(Entity::Orders, df)
}

pub fn clean_date_times(df: DataFrame) -> Result<DataFrame> {
    clean_default(Entity::DateTimes, df)
}
