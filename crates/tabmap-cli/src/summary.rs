use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabmap_map::{Assignment, ConfigurationSnapshot, FilterEngine, MappingStore};
use tabmap_model::{CellValue, Table as DataTable};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Numbered list of column names.
pub fn print_headers(headers: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Column")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, header) in headers.iter().enumerate() {
        table.add_row(vec![Cell::new(idx + 1), Cell::new(header)]);
    }
    println!("{table}");
}

pub fn print_values(column: &str, values: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell(column)]);
    apply_table_style(&mut table);
    for value in values {
        table.add_row(vec![Cell::new(value)]);
    }
    println!("{table}");
    println!("{} distinct value(s)", values.len());
}

/// One row per target column with its assignment.
pub fn print_mapping(mapping: &MappingStore) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target column"),
        header_cell("Source"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for (column, assignment) in mapping.iter() {
        let (source, value) = match assignment {
            Assignment::FromSource(header) => (Cell::new(header), dim_cell("-")),
            Assignment::Literal(text) => (dim_cell("-"), Cell::new(format!("\"{text}\""))),
            Assignment::Unassigned => (dim_cell("unassigned"), dim_cell("-")),
        };
        table.add_row(vec![Cell::new(column), source, value]);
    }
    println!("{table}");

    let summary = mapping.summary();
    println!(
        "{} column(s): {} from source, {} literal, {} unassigned",
        summary.total_columns, summary.from_source, summary.literal, summary.unassigned
    );
}

pub fn print_filters(filters: &FilterEngine, selected: usize, total: usize) {
    let active = filters.active_rules();
    if !active.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Filter column"), header_cell("Allowed values")]);
        apply_table_style(&mut table);
        for rule in active {
            let values: Vec<&str> = rule.values().iter().map(String::as_str).collect();
            table.add_row(vec![Cell::new(rule.column()), Cell::new(values.join(", "))]);
        }
        println!("{table}");
    }
    println!("{selected} of {total} row(s) selected");
}

/// First `limit` rows of an exported table.
pub fn print_preview(table: &DataTable, limit: usize) {
    let mut out = Table::new();
    out.set_header(table.headers.iter().map(|header| header_cell(header)));
    apply_table_style(&mut out);
    for row in table.rows.iter().take(limit) {
        out.add_row(row.iter().map(preview_cell));
    }
    println!("{out}");
    if table.row_count() > limit {
        println!("... {} more row(s)", table.row_count() - limit);
    }
}

pub fn print_snapshot(snapshot: &ConfigurationSnapshot) {
    let columns: Vec<String> =
        serde_json::from_str(&snapshot.target_headers_signature).unwrap_or_default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target column"),
        header_cell("Source"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for column in &columns {
        let source = snapshot
            .assignments
            .get(column)
            .map_or_else(|| dim_cell("-"), Cell::new);
        let value = snapshot
            .literal_values
            .get(column)
            .map_or_else(|| dim_cell("-"), |text| Cell::new(format!("\"{text}\"")));
        table.add_row(vec![Cell::new(column), source, value]);
    }
    println!("{table}");
    if let Some(saved_at) = &snapshot.saved_at {
        println!("Saved: {saved_at}");
    }
    println!("Format version: {}", snapshot.version);
}

fn preview_cell(cell: &CellValue) -> Cell {
    match cell {
        CellValue::Number(_) => Cell::new(cell).set_alignment(CellAlignment::Right),
        CellValue::Missing => dim_cell(""),
        _ => Cell::new(cell),
    }
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
