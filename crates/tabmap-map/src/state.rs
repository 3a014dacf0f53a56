//! Mapping state for the target-to-source assignment workflow.
//!
//! Every transition takes `&self` and returns a new [`MappingStore`]. A
//! rejected request returns a store equal to the original, so callers detect
//! change with `==` and never observe a partial update.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use tabmap_model::{SourceDataset, TargetSchema};

/// Data source chosen for one target column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Assignment {
    #[default]
    Unassigned,
    /// Values come from this source header.
    FromSource(String),
    /// Every row receives this fixed, non-empty text.
    Literal(String),
}

impl Assignment {
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::Unassigned)
    }

    pub fn source_header(&self) -> Option<&str> {
        match self {
            Self::FromSource(header) => Some(header),
            _ => None,
        }
    }

    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }
}

static UNASSIGNED: Assignment = Assignment::Unassigned;

/// Assignment state for every column of one target schema.
///
/// Only assigned columns are stored; a column missing from `assignments`
/// reads as [`Assignment::Unassigned`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingStore {
    /// Target columns in schema order
    columns: Vec<String>,
    /// target column -> assignment
    assignments: BTreeMap<String, Assignment>,
}

impl MappingStore {
    /// Create an all-`Unassigned` store for a schema.
    pub fn new(schema: &TargetSchema) -> Self {
        Self {
            columns: schema.headers().to_vec(),
            assignments: BTreeMap::new(),
        }
    }

    /// Rebuild a store from persisted source mappings and literal values.
    ///
    /// Columns are visited in schema order. Unknown columns are ignored, a
    /// literal wins over a source mapping for the same column, and a source
    /// header already taken by an earlier column is skipped.
    pub fn restore(
        schema: &TargetSchema,
        sources: &BTreeMap<String, String>,
        literals: &BTreeMap<String, String>,
    ) -> Self {
        let mut store = Self::new(schema);
        for column in schema.iter() {
            if let Some(text) = literals.get(column) {
                store = store.assign_literal(column, text);
                if store.assignment(column).is_assigned() {
                    continue;
                }
            }
            if let Some(header) = sources.get(column) {
                store = store.assign_from_source(column, header);
            }
        }
        store
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Current assignment for a target column.
    pub fn assignment(&self, column: &str) -> &Assignment {
        self.assignments.get(column).unwrap_or(&UNASSIGNED)
    }

    /// Columns paired with their assignments, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.columns
            .iter()
            .map(|column| (column.as_str(), self.assignment(column)))
    }

    /// Map `column` to `source_header`.
    ///
    /// Rejected (store unchanged) when the header is empty or already feeds a
    /// different column, and when `column` is not part of the schema. On
    /// success any literal value for `column` is discarded.
    #[must_use]
    pub fn assign_from_source(&self, column: &str, source_header: &str) -> Self {
        if !self.has_column(column) {
            debug!(column, source_header, "ignoring assignment to unknown column");
            return self.clone();
        }
        if source_header.is_empty() {
            debug!(column, "ignoring assignment of an empty source header");
            return self.clone();
        }
        if let Some(owner) = self.mapped_target_for(source_header)
            && owner != column
        {
            debug!(
                column,
                source_header,
                mapped_to = owner,
                "source header already mapped"
            );
            return self.clone();
        }
        let mut next = self.clone();
        next.assignments.insert(
            column.to_string(),
            Assignment::FromSource(source_header.to_string()),
        );
        next
    }

    /// Give `column` a fixed value. Blank text clears the column instead.
    #[must_use]
    pub fn assign_literal(&self, column: &str, text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.clear(column);
        }
        if !self.has_column(column) {
            debug!(column, "ignoring literal for unknown column");
            return self.clone();
        }
        let mut next = self.clone();
        next.assignments
            .insert(column.to_string(), Assignment::Literal(trimmed.to_string()));
        next
    }

    #[must_use]
    pub fn clear(&self, column: &str) -> Self {
        if !self.assignments.contains_key(column) {
            return self.clone();
        }
        let mut next = self.clone();
        next.assignments.remove(column);
        next
    }

    /// Same schema, every column `Unassigned`.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            assignments: BTreeMap::new(),
        }
    }

    /// Check if a source header is already used by some column.
    pub fn is_source_header_in_use(&self, source_header: &str) -> bool {
        self.mapped_target_for(source_header).is_some()
    }

    /// Target column currently fed by `source_header`, if any.
    pub fn mapped_target_for(&self, source_header: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, assignment)| assignment.source_header() == Some(source_header))
            .map(|(column, _)| column.as_str())
    }

    pub fn has_any_assignment(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// target column -> source header for every `FromSource` column.
    pub fn source_assignments(&self) -> BTreeMap<String, String> {
        self.assignments
            .iter()
            .filter_map(|(column, assignment)| {
                assignment
                    .source_header()
                    .map(|header| (column.clone(), header.to_string()))
            })
            .collect()
    }

    /// target column -> literal text for every `Literal` column.
    pub fn literal_values(&self) -> BTreeMap<String, String> {
        self.assignments
            .iter()
            .filter_map(|(column, assignment)| {
                assignment
                    .literal()
                    .map(|value| (column.clone(), value.to_string()))
            })
            .collect()
    }

    /// Source headers not yet mapped to any column, in dataset order.
    pub fn available_source_headers<'a>(&self, dataset: &'a SourceDataset) -> Vec<&'a str> {
        let used: HashSet<&str> = self
            .assignments
            .values()
            .filter_map(Assignment::source_header)
            .collect();
        dataset
            .headers()
            .iter()
            .map(String::as_str)
            .filter(|header| !used.contains(header))
            .collect()
    }

    /// Get summary counts, one entry per schema column.
    pub fn summary(&self) -> MappingSummary {
        let mut summary = MappingSummary {
            total_columns: self.columns.len(),
            from_source: 0,
            literal: 0,
            unassigned: 0,
        };
        for (_, assignment) in self.iter() {
            match assignment {
                Assignment::FromSource(_) => summary.from_source += 1,
                Assignment::Literal(_) => summary.literal += 1,
                Assignment::Unassigned => summary.unassigned += 1,
            }
        }
        summary
    }
}

/// Summary of assignment counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    /// Number of target columns.
    pub total_columns: usize,
    /// Columns fed from a source header.
    pub from_source: usize,
    /// Columns with a fixed value.
    pub literal: usize,
    /// Columns left empty on export.
    pub unassigned: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TargetSchema {
        TargetSchema::new(["Name", "Email", "Phone"]).unwrap()
    }

    #[test]
    fn unknown_column_is_ignored() {
        let store = MappingStore::new(&schema());
        assert_eq!(store.assign_from_source("Fax", "Fax"), store);
        assert_eq!(store.assign_literal("Fax", "x"), store);
    }

    #[test]
    fn remapping_same_column_to_same_header_is_allowed() {
        let store = MappingStore::new(&schema()).assign_from_source("Name", "Full Name");
        let again = store.assign_from_source("Name", "Full Name");
        assert_eq!(again, store);
        assert_eq!(
            again.assignment("Name"),
            &Assignment::FromSource("Full Name".to_string())
        );
    }

    #[test]
    fn summary_counts_each_kind() {
        let store = MappingStore::new(&schema())
            .assign_from_source("Name", "Full Name")
            .assign_literal("Email", "n/a");
        assert_eq!(
            store.summary(),
            MappingSummary {
                total_columns: 3,
                from_source: 1,
                literal: 1,
                unassigned: 1,
            }
        );
    }

    #[test]
    fn empty_source_header_is_rejected() {
        let store = MappingStore::new(&schema());
        assert_eq!(store.assign_from_source("Name", ""), store);
    }

    #[test]
    fn restore_prefers_literal_and_first_source_owner() {
        let mut sources = BTreeMap::new();
        sources.insert("Name".to_string(), "Full Name".to_string());
        sources.insert("Email".to_string(), "Full Name".to_string());
        sources.insert("Phone".to_string(), "Tel".to_string());
        sources.insert("Fax".to_string(), "Fax".to_string());
        let mut literals = BTreeMap::new();
        literals.insert("Phone".to_string(), "none".to_string());

        let store = MappingStore::restore(&schema(), &sources, &literals);
        assert_eq!(
            store.assignment("Name"),
            &Assignment::FromSource("Full Name".to_string())
        );
        assert_eq!(store.assignment("Email"), &Assignment::Unassigned);
        assert_eq!(
            store.assignment("Phone"),
            &Assignment::Literal("none".to_string())
        );
        assert!(!store.has_column("Fax"));
    }
}
