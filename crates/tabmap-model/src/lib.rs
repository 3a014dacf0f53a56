//! Core data types shared by every tabmap crate.
//!
//! A [`TargetSchema`] fixes the ordered output columns, a [`SourceDataset`]
//! carries the uploaded rows, and a [`Table`] is the rectangular result that
//! serializers consume.

pub mod cell;
pub mod error;
pub mod schema;
pub mod table;

pub use cell::CellValue;
pub use error::{ModelError, Result};
pub use schema::{Record, SourceDataset, TargetSchema};
pub use table::Table;
