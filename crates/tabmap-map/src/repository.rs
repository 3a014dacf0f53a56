//! Configuration cache for persisting and reusing a mapping.
//!
//! The cache keeps exactly one snapshot under [`CACHE_KEY`]; saving
//! overwrites it. A snapshot is only applied to a target schema whose
//! signature matches the one it was saved under.
//!
//! # Storage Format
//!
//! The snapshot is a JSON object:
//!
//! ```text
//! {
//!   "targetHeadersSignature": "[\"Name\",\"Email\"]",
//!   "assignments": { "Name": "Full Name" },
//!   "literalValues": { "Email": "n/a" },
//!   "savedAt": "2024-05-01T10:00:00+00:00",
//!   "version": "1.0"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tabmap_model::TargetSchema;

use crate::error::StoreError;
use crate::state::MappingStore;

/// Key of the single cache slot.
pub const CACHE_KEY: &str = "tabmap.mapping-config";

/// Synchronous string blob storage that survives process restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Returns whether an entry existed.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        (**self).remove(key)
    }
}

/// In-process store. Nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
///
/// Writes go to a temp file that is renamed over the target so a crash never
/// leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Open a store at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            operation: "create directory",
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                operation: "read",
                path,
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(|source| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(value.as_bytes())
            .map_err(|source| StoreError::Io {
                operation: "write",
                path: temp_path.clone(),
                source,
            })?;
        file.sync_all().map_err(|source| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &path).map_err(|source| StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.clone(),
            source,
        })?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                operation: "delete",
                path,
                source,
            }),
        }
    }
}

/// Normalize a key for use in file names.
fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Exact, order-sensitive serialization of a schema's headers.
pub fn schema_signature(schema: &TargetSchema) -> String {
    serde_json::Value::from(schema.headers().to_vec()).to_string()
}

/// Persisted mapping plus the schema signature it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSnapshot {
    pub target_headers_signature: String,
    /// target column -> source header
    #[serde(default)]
    pub assignments: BTreeMap<String, String>,
    /// target column -> literal text
    #[serde(default)]
    pub literal_values: BTreeMap<String, String>,
    /// RFC 3339 time of the save.
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl ConfigurationSnapshot {
    pub fn capture(schema: &TargetSchema, mapping: &MappingStore) -> Self {
        Self {
            target_headers_signature: schema_signature(schema),
            assignments: mapping.source_assignments(),
            literal_values: mapping.literal_values(),
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            version: default_version(),
        }
    }

    pub fn matches(&self, schema: &TargetSchema) -> bool {
        self.target_headers_signature == schema_signature(schema)
    }
}

/// Single-slot mapping cache over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct ConfigCache<S> {
    store: S,
}

impl<S: KeyValueStore> ConfigCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the slot with the mapping for `schema`.
    pub fn save(&mut self, schema: &TargetSchema, mapping: &MappingStore) -> Result<(), StoreError> {
        let snapshot = ConfigurationSnapshot::capture(schema, mapping);
        let json = serde_json::to_string(&snapshot)?;
        self.store.set(CACHE_KEY, &json)?;
        debug!(
            columns = schema.len(),
            mapped = snapshot.assignments.len(),
            literals = snapshot.literal_values.len(),
            "saved mapping configuration"
        );
        Ok(())
    }

    /// Stored mapping for `schema`, if the slot was saved under the same
    /// signature.
    ///
    /// Read failures and malformed blobs are logged and reported as a miss.
    pub fn try_restore(&self, schema: &TargetSchema) -> Option<MappingStore> {
        let snapshot = match self.peek() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("no cached mapping configuration");
                return None;
            }
            Err(error) => {
                warn!(%error, "ignoring unreadable mapping configuration");
                return None;
            }
        };
        if !snapshot.matches(schema) {
            debug!(
                stored = %snapshot.target_headers_signature,
                "cached mapping belongs to a different target schema"
            );
            return None;
        }
        info!(
            mapped = snapshot.assignments.len(),
            literals = snapshot.literal_values.len(),
            "restored cached mapping configuration"
        );
        Some(MappingStore::restore(
            schema,
            &snapshot.assignments,
            &snapshot.literal_values,
        ))
    }

    /// Raw snapshot in the slot.
    ///
    /// Unparseable JSON is logged and reported as `None`; only storage
    /// failures are errors.
    pub fn peek(&self) -> Result<Option<ConfigurationSnapshot>, StoreError> {
        let Some(blob) = self.store.get(CACHE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&blob) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(error) => {
                warn!(%error, "cached mapping configuration is not valid JSON");
                Ok(None)
            }
        }
    }

    /// Empty the slot. Returns whether anything was stored.
    pub fn clear(&mut self) -> Result<bool, StoreError> {
        self.store.remove(CACHE_KEY)
    }
}
