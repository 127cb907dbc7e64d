//! Retail data model definitions.
//!
//! - [`Entity`]: the business entities the pipeline extracts, cleans and loads
//! - [`categories`]: fixed allow-lists for categorical columns
//! - [`CleaningOptions`]: switches that alter the default cleaning pipelines

pub mod categories;
pub mod entity;
pub mod options;

pub use categories::CategorySet;
pub use entity::{Entity, SourceKind};
pub use options::CleaningOptions;
