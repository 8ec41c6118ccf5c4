//! Terminal rendering of reports, mappings, and schemas.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmap_core::IntakeReport;
use fieldmap_model::{CellValue, TableSchema};

use crate::commands::MappingRun;

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_report(report: &IntakeReport) {
    println!("Table: {}", report.table);
    if report.dry_run {
        println!("Dry run: no rows were written");
    }

    print_mapping_table(&report.mapping, &report.unmapped_columns);

    let mut counts = styled_table();
    counts.set_header(vec![header_cell("Outcome"), header_cell("Rows")]);
    if let Some(column) = counts.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    counts.add_row(vec![Cell::new("Total"), Cell::new(report.counts.total_rows)]);
    counts.add_row(vec![
        Cell::new(if report.dry_run {
            "Would insert"
        } else {
            "Inserted"
        })
        .fg(Color::Green),
        Cell::new(report.counts.inserted),
    ]);
    counts.add_row(vec![
        Cell::new("Skipped (already present)"),
        Cell::new(report.counts.skipped_existing),
    ]);
    counts.add_row(vec![
        Cell::new("Dropped (invalid)").fg(Color::Red),
        Cell::new(report.counts.dropped_invalid),
    ]);
    counts.add_row(vec![
        Cell::new("Dropped (duplicate)").fg(Color::Yellow),
        Cell::new(report.counts.dropped_duplicate),
    ]);
    println!("{counts}");

    if !report.preview.is_empty() {
        println!("Preview (first {} cleaned rows):", report.preview.len());
        let mut preview = styled_table();
        let fields: Vec<&String> = report.preview[0].keys().collect();
        preview.set_header(fields.iter().map(|name| header_cell(name)));
        for row in &report.preview {
            preview.add_row(row.values().map(|value| Cell::new(render_value(value))));
        }
        println!("{preview}");
    }
}

pub fn print_mapping(run: &MappingRun) {
    println!("Columns: {}", run.columns.join(", "));
    print_mapping_table(&run.outcome.mapping.to_map(), &run.outcome.unmapped);
}

fn print_mapping_table(
    mapping: &std::collections::BTreeMap<String, String>,
    unmapped: &[String],
) {
    let mut table = styled_table();
    table.set_header(vec![header_cell("Source column"), header_cell("Target field")]);
    for (raw, target) in mapping {
        table.add_row(vec![Cell::new(raw), Cell::new(target)]);
    }
    for raw in unmapped {
        table.add_row(vec![
            Cell::new(raw),
            Cell::new("(unmapped)").fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
}

pub fn print_schema(schema: &TableSchema) {
    println!("Table: {}", schema.table());
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Key"),
    ]);
    for field in schema.fields() {
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(field.field_type.as_str()),
            if field.is_primary_key {
                Cell::new("primary").fg(Color::Green)
            } else {
                Cell::new("")
            },
        ]);
    }
    println!("{table}");
}

fn render_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Integer(n) => n.to_string(),
        CellValue::Float(x) => x.to_string(),
        CellValue::Timestamp(dt) => dt.to_rfc3339(),
        CellValue::Missing => "∅".to_string(),
    }
}
