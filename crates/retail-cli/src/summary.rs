use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use retail_cli::types::{EntityReport, EntityStatus, RunReport};

pub fn print_summary(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Source"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Table"),
        header_cell("Status"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_in = 0usize;
    let mut total_out = 0usize;
    for entry in &report.entities {
        total_in += entry.rows_in.unwrap_or(0);
        total_out += entry.rows_out.unwrap_or(0);
        table.add_row(entity_row(entry));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_in).add_attribute(Attribute::Bold),
        Cell::new(total_out).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    let failures: Vec<&EntityReport> = report
        .entities
        .iter()
        .filter(|entry| entry.status.is_failure())
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for entry in failures {
            if let EntityStatus::Failed(message) = &entry.status {
                eprintln!("- {}: {message}", entry.entity);
            }
        }
    }
}

fn entity_row(entry: &EntityReport) -> Vec<Cell> {
    vec![
        Cell::new(entry.entity.as_str())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&entry.source),
        count_cell(entry.rows_in),
        count_cell(entry.rows_out),
        Cell::new(&entry.table),
        status_cell(&entry.status),
    ]
}

fn status_cell(status: &EntityStatus) -> Cell {
    match status {
        EntityStatus::Loaded(rows) => Cell::new(format!("loaded {rows}")).fg(Color::Green),
        EntityStatus::DryRun => Cell::new("dry run").fg(Color::Yellow),
        EntityStatus::Failed(_) => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
