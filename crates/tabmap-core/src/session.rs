//! Session controller.
//!
//! A [`Session`] is the one logical owner of the loaded schema, the source
//! dataset, the mapping and the filters. Commands run through `&mut self`
//! and swap in the new mapping or filter value in a single step; a mapping
//! change is written to the configuration cache before the command returns.
//!
//! Export runs as a deferred [`ExportJob`]. While a job exists the session
//! refuses to start another one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use tabmap_map::{
    ConfigCache, FilterEngine, KeyValueStore, MappingStore, RuleId, value_domain,
};
use tabmap_model::{SourceDataset, Table, TargetSchema};

use crate::export::{ExportError, generate};

/// Minimum time an export job takes, so a progress indicator is visible.
pub const DEFAULT_EXPORT_LATENCY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub min_export_latency: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_export_latency: DEFAULT_EXPORT_LATENCY,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no target schema loaded")]
    NoTarget,
    #[error("an export is already in progress")]
    ExportInProgress,
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What happened to the mapping when a target schema was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The cached configuration matched and was applied.
    Restored,
    /// No matching configuration; every column starts unassigned.
    Blank,
}

pub struct Session {
    target: Option<TargetSchema>,
    source: Option<Arc<SourceDataset>>,
    mapping: MappingStore,
    filters: FilterEngine,
    cache: ConfigCache<Box<dyn KeyValueStore + Send>>,
    export_busy: Arc<AtomicBool>,
    options: SessionOptions,
}

impl Session {
    pub fn new(store: impl KeyValueStore + Send + 'static, options: SessionOptions) -> Self {
        let store: Box<dyn KeyValueStore + Send> = Box::new(store);
        Self {
            target: None,
            source: None,
            mapping: MappingStore::default(),
            filters: FilterEngine::new(),
            cache: ConfigCache::new(store),
            export_busy: Arc::new(AtomicBool::new(false)),
            options,
        }
    }

    /// Replace the target schema and try to restore its cached mapping.
    pub fn load_target(&mut self, schema: TargetSchema) -> RestoreOutcome {
        let (mapping, outcome) = match self.cache.try_restore(&schema) {
            Some(mapping) => (mapping, RestoreOutcome::Restored),
            None => (MappingStore::new(&schema), RestoreOutcome::Blank),
        };
        info!(
            columns = schema.len(),
            restored = outcome == RestoreOutcome::Restored,
            "loaded target schema"
        );
        self.mapping = mapping;
        self.target = Some(schema);
        outcome
    }

    /// Replace the source dataset. Filters refer to source columns, so they
    /// are reset as well.
    pub fn load_source(&mut self, dataset: SourceDataset) {
        info!(
            columns = dataset.headers().len(),
            rows = dataset.row_count(),
            "loaded source dataset"
        );
        self.source = Some(Arc::new(dataset));
        self.filters = FilterEngine::new();
    }

    pub fn target(&self) -> Option<&TargetSchema> {
        self.target.as_ref()
    }

    pub fn source(&self) -> Option<&SourceDataset> {
        self.source.as_deref()
    }

    pub fn mapping(&self) -> &MappingStore {
        &self.mapping
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    // === Mapping commands ===

    /// Returns whether the mapping changed.
    pub fn assign_from_source(&mut self, column: &str, source_header: &str) -> bool {
        let next = self.mapping.assign_from_source(column, source_header);
        self.commit_mapping(next)
    }

    pub fn assign_literal(&mut self, column: &str, text: &str) -> bool {
        let next = self.mapping.assign_literal(column, text);
        self.commit_mapping(next)
    }

    pub fn clear(&mut self, column: &str) -> bool {
        let next = self.mapping.clear(column);
        self.commit_mapping(next)
    }

    /// Unassign every column.
    pub fn reset_mapping(&mut self) -> bool {
        let next = self.mapping.reset();
        self.commit_mapping(next)
    }

    pub fn is_source_header_in_use(&self, source_header: &str) -> bool {
        self.mapping.is_source_header_in_use(source_header)
    }

    pub fn has_any_assignment(&self) -> bool {
        self.mapping.has_any_assignment()
    }

    fn commit_mapping(&mut self, next: MappingStore) -> bool {
        if next == self.mapping {
            return false;
        }
        self.mapping = next;
        self.persist_mapping();
        true
    }

    fn persist_mapping(&mut self) {
        let Some(target) = &self.target else {
            return;
        };
        if let Err(error) = self.cache.save(target, &self.mapping) {
            warn!(%error, "failed to save mapping configuration");
        }
    }

    // === Filter commands ===

    pub fn add_filter_rule(&mut self) -> RuleId {
        let (next, id) = self.filters.add_rule();
        self.filters = next;
        debug!(rule = %id, "added filter rule");
        id
    }

    pub fn remove_filter_rule(&mut self, id: RuleId) -> bool {
        let next = self.filters.remove_rule(id);
        self.commit_filters(next)
    }

    pub fn set_filter_column(&mut self, id: RuleId, column: &str) -> bool {
        let next = self.filters.set_rule_column(id, column);
        self.commit_filters(next)
    }

    pub fn set_filter_values<I, S>(&mut self, id: RuleId, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next = self.filters.set_rule_values(id, values);
        self.commit_filters(next)
    }

    fn commit_filters(&mut self, next: FilterEngine) -> bool {
        if next == self.filters {
            return false;
        }
        self.filters = next;
        true
    }

    /// Selectable values for a filter on `column`; empty without a source.
    pub fn value_domain(&self, column: &str) -> Vec<String> {
        self.source
            .as_deref()
            .map(|dataset| value_domain(dataset, column))
            .unwrap_or_default()
    }

    /// Number of source rows that pass the current filters.
    pub fn selected_row_count(&self) -> usize {
        self.source
            .as_deref()
            .map_or(0, |dataset| self.filters.apply(dataset).len())
    }

    // === Export ===

    pub fn export_in_progress(&self) -> bool {
        self.export_busy.load(Ordering::Acquire)
    }

    /// Capture the current state into an export job.
    ///
    /// Fails without touching any state when no target is loaded, when
    /// nothing is configured, or while another job is still alive.
    pub fn begin_export(&self) -> Result<ExportJob, SessionError> {
        let target = self.target.as_ref().ok_or(SessionError::NoTarget)?;
        if !self.mapping.has_any_assignment() {
            return Err(ExportError::NothingConfigured.into());
        }
        if self
            .export_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("export requested while another export is running");
            return Err(SessionError::ExportInProgress);
        }
        Ok(ExportJob {
            schema: target.clone(),
            mapping: self.mapping.clone(),
            filters: self.filters.clone(),
            dataset: self.source.clone().unwrap_or_default(),
            latency: self.options.min_export_latency,
            guard: BusyGuard(Arc::clone(&self.export_busy)),
        })
    }
}

/// A captured export, ready to run once.
#[derive(Debug)]
pub struct ExportJob {
    schema: TargetSchema,
    mapping: MappingStore,
    filters: FilterEngine,
    dataset: Arc<SourceDataset>,
    latency: Duration,
    guard: BusyGuard,
}

impl ExportJob {
    /// Wait out the minimum latency, then build the table. Runs to
    /// completion; the session accepts a new export once this returns.
    pub async fn run(self) -> Result<Table, ExportError> {
        tokio::time::sleep(self.latency).await;
        let result = generate(&self.schema, &self.mapping, &self.filters, &self.dataset);
        drop(self.guard);
        result
    }
}

/// Lowers the busy flag when the job finishes or is dropped unrun.
#[derive(Debug)]
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
