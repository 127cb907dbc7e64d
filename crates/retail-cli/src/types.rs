//! Per-entity results collected during a run.

use retail_model::Entity;

/// Final state of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityStatus {
    /// Cleaned and uploaded; holds the rows written.
    Loaded(usize),
    /// Cleaned but not uploaded (`--dry-run`).
    DryRun,
    /// Extraction, cleaning or upload failed.
    Failed(String),
}

impl EntityStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, EntityStatus::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct EntityReport {
    pub entity: Entity,
    /// Where the raw data came from.
    pub source: String,
    pub rows_in: Option<usize>,
    pub rows_out: Option<usize>,
    /// Sink table name.
    pub table: String,
    pub status: EntityStatus,
}

impl EntityReport {
    pub fn failed(entity: Entity, source: impl Into<String>, table: impl Into<String>, error: String) -> Self {
        Self {
            entity,
            source: source.into(),
            rows_in: None,
            rows_out: None,
            table: table.into(),
            status: EntityStatus::Failed(error),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub entities: Vec<EntityReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.entities.iter().any(|report| report.status.is_failure())
    }
}
