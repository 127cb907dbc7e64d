use std::collections::BTreeSet;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{error, info};

use retail_clean::pipeline_for;
use retail_cli::config::PipelineConfig;
use retail_cli::pipeline::{process_entity, source_for};
use retail_cli::types::{EntityReport, RunReport};
use retail_db::DatabaseConnector;
use retail_ingest::FileSource;
use retail_model::Entity;

use crate::cli::{CleanArgs, RunArgs, TablesArgs};
use crate::summary::apply_table_style;

pub fn run_pipeline(args: &RunArgs, config: &PipelineConfig) -> Result<RunReport> {
    // Ord on Entity is load order: dimensions before orders.
    let entities: BTreeSet<Entity> = if args.entities.is_empty() {
        Entity::ALL.into_iter().collect()
    } else {
        args.entities.iter().copied().collect()
    };
    let mut sink = open_sink(config, args.dry_run)?;

    let mut report = RunReport::default();
    for entity in entities {
        let table = config.tables.table_for(entity);
        let entity_report = match source_for(entity, config) {
            Ok(source) => {
                process_entity(entity, source.as_ref(), table, &config.cleaning, sink.as_mut())
            }
            Err(e) => {
                let message = format!("{e:#}");
                error!(%entity, error = %message, "source not available");
                EntityReport::failed(entity, "-", table, message)
            }
        };
        report.entities.push(entity_report);
    }
    Ok(report)
}

pub fn run_clean(args: &CleanArgs, config: &PipelineConfig) -> Result<RunReport> {
    let source = FileSource::new(&args.input);
    let table = args
        .table
        .as_deref()
        .unwrap_or_else(|| config.tables.table_for(args.entity));
    let mut sink = open_sink(config, args.dry_run)?;
    let entity_report = process_entity(args.entity, &source, table, &config.cleaning, sink.as_mut());
    Ok(RunReport {
        entities: vec![entity_report],
    })
}

pub fn run_entities(config: &PipelineConfig) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Entity", "Description", "Source", "Table", "Steps"]);
    apply_table_style(&mut table);
    for entity in Entity::ALL {
        let pipeline = pipeline_for(entity, &config.cleaning);
        table.add_row(vec![
            entity.as_str().to_string(),
            entity.description().to_string(),
            entity.source_kind().to_string(),
            config.tables.table_for(entity).to_string(),
            pipeline.describe(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_tables(args: &TablesArgs, config: &PipelineConfig) -> Result<()> {
    let mut connector = if args.target {
        DatabaseConnector::open(&config.target_database)
    } else {
        DatabaseConnector::open_read_only(&config.source_database)
    }
    .context("open database")?;
    let tables = connector.list_tables().context("list tables")?;
    println!("Database: {}", connector.label());
    if tables.is_empty() {
        println!("(no tables)");
    }
    for name in tables {
        println!("{name}");
    }
    Ok(())
}

fn open_sink(config: &PipelineConfig, dry_run: bool) -> Result<Option<DatabaseConnector>> {
    if dry_run {
        info!("dry run: cleaned data will not be uploaded");
        return Ok(None);
    }
    let connector = DatabaseConnector::open(&config.target_database).with_context(|| {
        format!("open target database {}", config.target_database.describe())
    })?;
    Ok(Some(connector))
}
