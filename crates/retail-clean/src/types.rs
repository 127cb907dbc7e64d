//! Pipeline types: cleaning steps and per-entity step sequences.

use serde::{Deserialize, Serialize};

use retail_model::Entity;

/// Which rows a null-dropping step removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Rows with at least one null cell.
    #[default]
    Any,
    /// Rows where every cell is null.
    All,
}

impl NullPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

/// One step of an entity cleaning pipeline.
///
/// Structural steps add, remove or rename columns and rows; every other
/// step is a column rule that only rewrites cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CleaningStep {
    /// Remove columns that carry no information.
    DropColumns { columns: Vec<String> },

    RenameColumn { from: String, to: String },

    DropNulls {
        #[serde(default)]
        policy: NullPolicy,
    },

    DropDuplicates,

    /// Fill the first row's nulls with a placeholder.
    RepairFirstRow { placeholder: String },

    /// Replace one exact value in a column (typo fixes).
    ReplaceValue {
        column: String,
        from: String,
        to: String,
    },

    /// Null country codes longer than two characters.
    CountryCode { column: String },

    /// Normalize mixed-format dates to `YYYY-MM-DD` strings.
    Dates { columns: Vec<String> },

    /// Validate phone numbers against the row's country pattern.
    PhoneNumbers {
        column: String,
        country_column: String,
    },

    Uuids { columns: Vec<String> },

    /// Null values outside an allow-list.
    Categorical {
        column: String,
        allowed: Vec<String>,
    },

    /// Strip `?` and null non-digit card numbers.
    CardNumbers { column: String },

    /// Null card numbers whose length does not match the provider.
    CardNumberLength {
        column: String,
        provider_column: String,
    },

    /// Parse a mixed-format date column into a `Date` column.
    PaymentDate { column: String },

    /// Parse a `MM/YY` column into a `Date` column.
    ExpiryDate { column: String },

    /// Parse an `HH:MM:SS` column into a `Time` column.
    TimeOfDay { column: String },

    LatLong { columns: Vec<String> },

    /// Convert product weights to kilograms.
    Weights { column: String },

    /// Convert to `Int64`; values that do not convert take the fallback.
    ///
    /// With `truncate`, fractional numbers keep their integer part;
    /// otherwise they do not convert.
    IntegerCoerce {
        column: String,
        #[serde(default)]
        fallback: Option<i64>,
        #[serde(default)]
        truncate: bool,
    },

    /// Rewrite numeric values as integer strings.
    IntegerStrings { columns: Vec<String> },
}

impl CleaningStep {
    /// Returns a human-readable display name for the step.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DropColumns { .. } => "Drop columns",
            Self::RenameColumn { .. } => "Rename column",
            Self::DropNulls { .. } => "Drop nulls",
            Self::DropDuplicates => "Drop duplicates",
            Self::RepairFirstRow { .. } => "Repair first row",
            Self::ReplaceValue { .. } => "Replace value",
            Self::CountryCode { .. } => "Country code",
            Self::Dates { .. } => "Dates",
            Self::PhoneNumbers { .. } => "Phone numbers",
            Self::Uuids { .. } => "UUIDs",
            Self::Categorical { .. } => "Categorical",
            Self::CardNumbers { .. } => "Card numbers",
            Self::CardNumberLength { .. } => "Card number length",
            Self::PaymentDate { .. } => "Payment date",
            Self::ExpiryDate { .. } => "Expiry date",
            Self::TimeOfDay { .. } => "Time of day",
            Self::LatLong { .. } => "Lat/long",
            Self::Weights { .. } => "Weights",
            Self::IntegerCoerce { .. } => "Integer",
            Self::IntegerStrings { .. } => "Integer strings",
        }
    }

    /// Whether the step can remove rows or change the set of columns.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DropColumns { .. }
                | Self::RenameColumn { .. }
                | Self::DropNulls { .. }
                | Self::DropDuplicates
        )
    }

    /// One-line description including the step's columns and parameters.
    pub fn describe(&self) -> String {
        let name = self.display_name();
        match self {
            Self::DropColumns { columns }
            | Self::Dates { columns }
            | Self::Uuids { columns }
            | Self::LatLong { columns }
            | Self::IntegerStrings { columns } => format!("{name} [{}]", columns.join(", ")),
            Self::RenameColumn { from, to } => format!("{name} {from} -> {to}"),
            Self::DropNulls { policy } => format!("{name} ({})", policy.as_str()),
            Self::DropDuplicates => name.to_string(),
            Self::RepairFirstRow { placeholder } => format!("{name} ({placeholder:?})"),
            Self::ReplaceValue { column, from, to } => {
                format!("{name} {column}: {from:?} -> {to:?}")
            }
            Self::PhoneNumbers {
                column,
                country_column,
            } => format!("{name} {column} by {country_column}"),
            Self::Categorical { column, allowed } => {
                format!("{name} {column} ({} values)", allowed.len())
            }
            Self::CardNumberLength {
                column,
                provider_column,
            } => format!("{name} {column} by {provider_column}"),
            Self::IntegerCoerce {
                column,
                fallback,
                truncate,
            } => {
                let mut notes = Vec::new();
                if let Some(fallback) = fallback {
                    notes.push(format!("fallback {fallback}"));
                }
                if *truncate {
                    notes.push("truncated".to_string());
                }
                if notes.is_empty() {
                    format!("{name} {column}")
                } else {
                    format!("{name} {column} ({})", notes.join(", "))
                }
            }
            Self::CountryCode { column }
            | Self::CardNumbers { column }
            | Self::PaymentDate { column }
            | Self::ExpiryDate { column }
            | Self::TimeOfDay { column }
            | Self::Weights { column } => format!("{name} {column}"),
        }
    }
}

/// Ordered cleaning steps for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningPipeline {
    pub entity: Entity,
    pub steps: Vec<CleaningStep>,
}

impl CleaningPipeline {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: CleaningStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step only when `enabled`.
    #[must_use]
    pub fn step_if(self, enabled: bool, step: CleaningStep) -> Self {
        if enabled { self.step(step) } else { self }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Numbered step descriptions, one per line.
    pub fn describe(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(idx, step)| format!("{:>2}. {}", idx + 1, step.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_serialize_with_tag() {
        let step = CleaningStep::IntegerCoerce {
            column: "staff_numbers".to_string(),
            fallback: Some(0),
            truncate: true,
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "step": "integer_coerce",
                "column": "staff_numbers",
                "fallback": 0,
                "truncate": true
            })
        );

        let parsed: CleaningStep =
            serde_json::from_str(r#"{"step": "integer_coerce", "column": "product_quantity"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            CleaningStep::IntegerCoerce {
                column: "product_quantity".to_string(),
                fallback: None,
                truncate: false,
            }
        );

        let parsed: CleaningStep = serde_json::from_str(r#"{"step": "drop_duplicates"}"#).unwrap();
        assert_eq!(parsed, CleaningStep::DropDuplicates);

        let parsed: CleaningStep = serde_json::from_str(r#"{"step": "drop_nulls"}"#).unwrap();
        assert_eq!(parsed, CleaningStep::DropNulls { policy: NullPolicy::Any });
    }

    #[test]
    fn structural_steps() {
        assert!(CleaningStep::DropDuplicates.is_structural());
        assert!(
            !CleaningStep::Weights {
                column: "weight".to_string()
            }
            .is_structural()
        );
    }

    #[test]
    fn conditional_steps() {
        let pipeline = CleaningPipeline::new(Entity::Cards)
            .step_if(false, CleaningStep::DropDuplicates)
            .step(CleaningStep::DropNulls {
                policy: NullPolicy::All,
            });
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.describe(), " 1. Drop nulls (all)");
    }
}
