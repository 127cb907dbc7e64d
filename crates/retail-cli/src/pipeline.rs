//! Extract, clean and load for a single entity.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, info_span};

use retail_clean::clean_entity;
use retail_db::{DatabaseConnector, DatabaseTable};
use retail_ingest::{ObjectStorageSource, PdfSource, PdfTableLayout, SourceAdapter, StoreApi};
use retail_model::{CleaningOptions, Entity, SourceKind};

use crate::config::{ConfigError, PipelineConfig};
use crate::types::{EntityReport, EntityStatus};

/// Build the configured source adapter for an entity.
pub fn source_for(entity: Entity, config: &PipelineConfig) -> Result<Box<dyn SourceAdapter>> {
    let sources = &config.sources;
    let adapter: Box<dyn SourceAdapter> = match entity.source_kind() {
        SourceKind::Database => {
            let table = sources
                .table(entity)
                .ok_or(ConfigError::Missing { key: "sources", entity })?;
            Box::new(DatabaseTable::new(config.source_database.clone(), table))
        }
        SourceKind::Pdf => Box::new(
            PdfSource::new(sources.location(entity)?, PdfTableLayout::card_details())
                .with_timeout(sources.timeout()),
        ),
        SourceKind::Api => Box::new(StoreApi::new(config.require_api()?.clone())?),
        SourceKind::ObjectStorage => Box::new(ObjectStorageSource::with_timeout(
            sources.location(entity)?,
            sources.timeout(),
        )?),
    };
    Ok(adapter)
}

/// Run one entity end to end. Failures are logged and recorded in the report.
///
/// With no sink the cleaned frame is discarded.
pub fn process_entity(
    entity: Entity,
    source: &dyn SourceAdapter,
    table: &str,
    options: &CleaningOptions,
    sink: Option<&mut DatabaseConnector>,
) -> EntityReport {
    let span = info_span!("entity", entity = %entity);
    let _guard = span.enter();
    let started = Instant::now();

    let mut report = EntityReport {
        entity,
        source: source.describe(),
        rows_in: None,
        rows_out: None,
        table: table.to_string(),
        status: EntityStatus::DryRun,
    };
    match extract_clean_load(&mut report, source, options, sink) {
        Ok(()) => info!(elapsed_ms = started.elapsed().as_millis() as u64, "entity done"),
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "entity failed");
            report.status = EntityStatus::Failed(message);
        }
    }
    report
}

fn extract_clean_load(
    report: &mut EntityReport,
    source: &dyn SourceAdapter,
    options: &CleaningOptions,
    sink: Option<&mut DatabaseConnector>,
) -> Result<()> {
    let raw = source
        .fetch()
        .with_context(|| format!("extract from {}", report.source))?;
    info!(rows = raw.height(), columns = raw.width(), "extracted");
    report.rows_in = Some(raw.height());

    let outcome = clean_entity(report.entity, raw, options)
        .with_context(|| format!("clean {}", report.entity))?;
    report.rows_out = Some(outcome.output_rows);

    report.status = match sink {
        Some(db) => {
            let written = db
                .upload(&outcome.frame, &report.table)
                .with_context(|| format!("upload to {}", report.table))?;
            EntityStatus::Loaded(written)
        }
        None => EntityStatus::DryRun,
    };
    Ok(())
}
