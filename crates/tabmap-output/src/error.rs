//! Error types for table writers.

use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XLSX error: {0}")]
    Workbook(#[from] XlsxError),
    #[error("table has {rows} rows, more than a worksheet can hold")]
    TooManyRows { rows: usize },
    #[error("table has {columns} columns, more than a worksheet can hold")]
    TooManyColumns { columns: usize },
}

pub type Result<T> = std::result::Result<T, OutputError>;
