#![deny(unsafe_code)]

//! Assignment state between target columns and source data.
//!
//! - [`MappingStore`] holds one [`Assignment`] per target column.
//! - [`FilterEngine`] restricts which source rows take part in an export.
//! - [`ConfigCache`] persists the mapping keyed by the target schema.

pub mod error;
pub mod filter;
pub mod repository;
pub mod state;

pub use error::StoreError;
pub use filter::{FilterEngine, FilterRule, RuleId, cell_to_comparable, value_domain};
pub use repository::{
    CACHE_KEY, ConfigCache, ConfigurationSnapshot, FileStore, KeyValueStore, MemoryStore,
    schema_signature,
};
pub use state::{Assignment, MappingStore, MappingSummary};
