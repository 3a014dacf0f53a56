#![deny(unsafe_code)]

use crate::{CellValue, ModelError};

/// Rectangular export result: one header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), ModelError> {
        if row.len() != self.headers.len() {
            return Err(ModelError::RaggedRow {
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The table as `[header_row, ...data_rows]`.
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.headers.iter().cloned().map(CellValue::Text).collect());
        grid.extend(self.rows.iter().cloned());
        grid
    }
}
