//! Tabular ingestion for tabmap.
//!
//! Turns CSV files into the two inputs of a mapping session:
//!
//! - **Target schema**: the first non-blank row's non-empty cells, in order
//! - **Source dataset**: a header row plus typed row records
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabmap_ingest::{read_source_dataset, read_target_schema};
//!
//! let schema = read_target_schema(Path::new("template.csv"))?;
//! let dataset = read_source_dataset(Path::new("contacts.csv"))?;
//! ```

mod csv_table;
mod error;

pub use csv_table::{parse_cell, read_source_dataset, read_target_schema};
pub use error::{IngestError, Result};
