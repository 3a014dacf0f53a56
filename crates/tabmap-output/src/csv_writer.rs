use std::fs::File;
use std::io::Write;
use std::path::Path;

use tabmap_model::{CellValue, Table};

use crate::error::{OutputError, Result};

/// Write the header row and every data row as CSV.
///
/// Cells are written in their comparable text form; missing cells are empty.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(false).from_writer(writer);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(CellValue::to_comparable))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_csv_file(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, file)
}
