//! Cleaning rules and entity pipelines for the retail ETL.
//!
//! This crate provides:
//! - **rules**: stateless column rules (country codes, dates, phone numbers,
//!   UUIDs, categorical filters, card numbers, geo fields, weights, integers)
//! - **structure**: row and column edits (drop nulls/duplicates, drop and
//!   rename columns, value fixes, first-row repair)
//! - **pipelines**: the fixed step sequence for each [`Entity`]
//! - **executor**: runs a [`CleaningPipeline`] over a DataFrame
//!
//! # Example
//!
//! ```ignore
//! use retail_clean::{clean_users, execute_pipeline, pipeline_for};
//! use retail_model::{CleaningOptions, Entity};
//!
//! let cleaned = clean_users(raw_users)?;
//!
//! // Or inspect and run a pipeline explicitly
//! let pipeline = pipeline_for(Entity::Users, &CleaningOptions::default());
//! let outcome = execute_pipeline(raw_users, &pipeline)?;
//! ```
//!
//! Cell-level failures never surface as errors: a value that cannot be
//! parsed or validated becomes null. Errors are reserved for structural
//! problems such as a missing column.

mod cleaners;
mod error;
mod executor;
mod pipelines;
mod types;

pub mod rules;
pub mod structure;

pub use retail_model::Entity;

// Core types
pub use types::{CleaningPipeline, CleaningStep, NullPolicy};

// Error type
pub use error::{CleanError, Result};

// Pipeline building
pub use pipelines::pipeline_for;

// Execution
pub use executor::{CleanOutcome, StepOutcome, apply_step, execute_pipeline};

// Entity cleaners
pub use cleaners::{
    clean_cards, clean_date_times, clean_entity, clean_orders, clean_products, clean_stores,
    clean_users,
};
