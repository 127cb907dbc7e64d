//! Pipeline execution.
//!
//! Runs the steps of a [`CleaningPipeline`] in order over one DataFrame,
//! recording row counts and affected cells per step.

use polars::prelude::DataFrame;
use serde::Serialize;

use retail_model::Entity;

use crate::error::Result;
use crate::rules;
use crate::structure;
use crate::types::{CleaningPipeline, CleaningStep};

/// What one step did to the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: String,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Cells nulled or rewritten, rows removed, or columns dropped.
    pub affected: usize,
}

impl StepOutcome {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// The cleaned frame plus per-step accounting.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub entity: Entity,
    pub frame: DataFrame,
    pub input_rows: usize,
    pub output_rows: usize,
    pub steps: Vec<StepOutcome>,
}

impl CleanOutcome {
    pub fn rows_removed(&self) -> usize {
        self.input_rows.saturating_sub(self.output_rows)
    }
}

/// Execute a cleaning pipeline, consuming the source frame.
///
/// Stops at the first structural error; cell-level failures only show up
/// in the step counts.
pub fn execute_pipeline(mut df: DataFrame, pipeline: &CleaningPipeline) -> Result<CleanOutcome> {
    let input_rows = df.height();
    let mut steps = Vec::with_capacity(pipeline.len());

    for step in &pipeline.steps {
        let rows_before = df.height();
        let affected = apply_step(&mut df, step)?;
        let outcome = StepOutcome {
            step: step.describe(),
            rows_before,
            rows_after: df.height(),
            affected,
        };
        tracing::debug!(
            entity = %pipeline.entity,
            step = %outcome.step,
            rows = outcome.rows_after,
            affected,
            "applied cleaning step"
        );
        steps.push(outcome);
    }

    let output_rows = df.height();
    tracing::info!(
        entity = %pipeline.entity,
        input_rows,
        output_rows,
        "cleaned {}",
        pipeline.entity.description()
    );

    Ok(CleanOutcome {
        entity: pipeline.entity,
        frame: df,
        input_rows,
        output_rows,
        steps,
    })
}

/// Apply a single step in place, returning the number of affected cells, rows or columns.
pub fn apply_step(df: &mut DataFrame, step: &CleaningStep) -> Result<usize> {
    match step {
        CleaningStep::DropColumns { columns } => structure::drop_columns(df, columns),
        CleaningStep::RenameColumn { from, to } => structure::rename_column(df, from, to),
        CleaningStep::DropNulls { policy } => structure::drop_nulls(df, *policy),
        CleaningStep::DropDuplicates => structure::drop_duplicates(df),
        CleaningStep::RepairFirstRow { placeholder } => {
            structure::repair_first_row(df, placeholder)
        }
        CleaningStep::ReplaceValue { column, from, to } => {
            structure::replace_value(df, column, from, to)
        }
        CleaningStep::CountryCode { column } => rules::clean_country_code(df, column),
        CleaningStep::Dates { columns } => rules::clean_dates(df, columns),
        CleaningStep::PhoneNumbers {
            column,
            country_column,
        } => rules::clean_phone_numbers(df, column, country_column),
        CleaningStep::Uuids { columns } => rules::clean_uuids(df, columns),
        CleaningStep::Categorical { column, allowed } => {
            rules::filter_categories(df, column, allowed)
        }
        CleaningStep::CardNumbers { column } => rules::clean_card_numbers(df, column),
        CleaningStep::CardNumberLength {
            column,
            provider_column,
        } => rules::enforce_card_number_length(df, column, provider_column),
        CleaningStep::PaymentDate { column } => rules::parse_date_column(df, column),
        CleaningStep::ExpiryDate { column } => rules::parse_expiry_column(df, column),
        CleaningStep::TimeOfDay { column } => rules::parse_time_column(df, column),
        CleaningStep::LatLong { columns } => rules::clean_lat_long(df, columns),
        CleaningStep::Weights { column } => rules::convert_weights(df, column),
        CleaningStep::IntegerCoerce {
            column,
            fallback,
            truncate,
        } => rules::coerce_integer(df, column, *fallback, *truncate),
        CleaningStep::IntegerStrings { columns } => rules::integer_strings(df, columns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NullPolicy;
    use polars::prelude::*;

    #[test]
    fn records_step_outcomes() {
        let df = DataFrame::new(vec![
            Series::new("country_code".into(), vec![Some("GB"), Some("GGB"), None]).into_column(),
        ])
        .unwrap();
        let pipeline = CleaningPipeline::new(Entity::Users)
            .step(CleaningStep::CountryCode {
                column: "country_code".to_string(),
            })
            .step(CleaningStep::DropNulls {
                policy: NullPolicy::Any,
            });

        let outcome = execute_pipeline(df, &pipeline).unwrap();

        assert_eq!(outcome.input_rows, 3);
        assert_eq!(outcome.output_rows, 1);
        assert_eq!(outcome.rows_removed(), 2);
        assert_eq!(outcome.steps.len(), 2);
        assert_eq!(outcome.steps[0].affected, 1);
        assert_eq!(outcome.steps[0].rows_removed(), 0);
        assert_eq!(outcome.steps[1].rows_removed(), 2);
    }

    #[test]
    fn stops_on_missing_column() {
        let df = DataFrame::new(vec![
            Series::new("other".into(), vec!["x"]).into_column(),
        ])
        .unwrap();
        let pipeline = CleaningPipeline::new(Entity::Users).step(CleaningStep::Uuids {
            columns: vec!["user_uuid".to_string()],
        });

        assert!(execute_pipeline(df, &pipeline).is_err());
    }
}
