//! Materialize the output table from mapping, filters and source rows.

use thiserror::Error;
use tracing::{debug, info};

use tabmap_map::{Assignment, FilterEngine, MappingStore};
use tabmap_model::{CellValue, ModelError, Record, SourceDataset, Table, TargetSchema};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// No column has a source mapping or a literal value.
    #[error("nothing to export: map a source column or set a literal value first")]
    NothingConfigured,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Build the output table.
///
/// Rows are the filtered source rows in original order. Each cell follows a
/// fixed precedence: the column's literal value, else the mapped source
/// cell when the row has one, else the empty string.
pub fn generate(
    schema: &TargetSchema,
    mapping: &MappingStore,
    filters: &FilterEngine,
    dataset: &SourceDataset,
) -> Result<Table, ExportError> {
    if !mapping.has_any_assignment() {
        return Err(ExportError::NothingConfigured);
    }

    let rows = filters.apply(dataset);
    debug!(
        total_rows = dataset.row_count(),
        selected_rows = rows.len(),
        active_filters = filters.active_rules().len(),
        "filtered source rows"
    );

    let assignments: Vec<&Assignment> = schema
        .iter()
        .map(|column| mapping.assignment(column))
        .collect();

    let mut table = Table::new(schema.headers().to_vec());
    for row in rows {
        table.push_row(
            assignments
                .iter()
                .map(|assignment| resolve_cell(assignment, row))
                .collect(),
        )?;
    }

    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "generated export table"
    );
    Ok(table)
}

fn resolve_cell(assignment: &Assignment, row: &Record) -> CellValue {
    match assignment {
        Assignment::Literal(value) => CellValue::Text(value.clone()),
        Assignment::FromSource(header) => match row.get(header) {
            Some(CellValue::Missing) | None => CellValue::empty(),
            Some(cell) => cell.clone(),
        },
        Assignment::Unassigned => CellValue::empty(),
    }
}
