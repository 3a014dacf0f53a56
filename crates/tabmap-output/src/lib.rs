//! Writers for exported tables.

mod csv_writer;
mod error;
mod types;
mod workbook;

pub use csv_writer::{write_csv, write_csv_file};
pub use error::{OutputError, Result};
pub use types::{OutputFormat, default_file_name};
pub use workbook::write_workbook;

use std::path::{Path, PathBuf};

use tracing::info;

use tabmap_model::Table;

/// Write `table` into `dir` under the default file name for `format`.
///
/// The directory is created when missing. Returns the written path.
pub fn write_table(table: &Table, format: OutputFormat, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(default_file_name(format));
    match format {
        OutputFormat::Workbook => write_workbook(table, &path)?,
        OutputFormat::Csv => write_csv_file(table, &path)?,
    }
    info!(
        path = %path.display(),
        format = format.extension(),
        rows = table.row_count(),
        "wrote output table"
    );
    Ok(path)
}
