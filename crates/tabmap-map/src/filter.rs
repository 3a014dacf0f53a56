//! Row filters over a source dataset.
//!
//! A rule is active once it has both a column and at least one value. Active
//! rules combine with AND; the values inside one rule combine with OR. With no
//! active rule every row passes, whatever inactive rules exist.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use tabmap_model::{CellValue, Record, SourceDataset};

/// Opaque identity of a filter rule within one [`FilterEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    id: RuleId,
    /// Source header, empty while the rule is being set up.
    column: String,
    values: BTreeSet<String>,
}

impl FilterRule {
    fn new(id: RuleId) -> Self {
        Self {
            id,
            column: String::new(),
            values: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    pub fn is_active(&self) -> bool {
        !self.column.is_empty() && !self.values.is_empty()
    }

    /// True when the row's value for this rule's column is one of `values`.
    pub fn matches(&self, row: &Record) -> bool {
        let value = cell_to_comparable(row.get(&self.column));
        self.values.contains(&value)
    }
}

/// Ordered list of filter rules.
///
/// Like the mapping store, every edit returns a new engine and leaves the
/// original untouched. Edits naming an unknown [`RuleId`] are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterEngine {
    rules: Vec<FilterRule>,
    next_id: u64,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty rule. It has no effect until a column and values are set.
    #[must_use]
    pub fn add_rule(&self) -> (Self, RuleId) {
        let id = RuleId(self.next_id);
        let mut next = self.clone();
        next.next_id += 1;
        next.rules.push(FilterRule::new(id));
        (next, id)
    }

    #[must_use]
    pub fn remove_rule(&self, id: RuleId) -> Self {
        let mut next = self.clone();
        next.rules.retain(|rule| rule.id != id);
        next
    }

    /// Point a rule at `column`. The selected values are always discarded,
    /// since they belong to the previous column's value domain.
    #[must_use]
    pub fn set_rule_column(&self, id: RuleId, column: impl Into<String>) -> Self {
        let column = column.into();
        self.update(id, |rule| {
            rule.column = column;
            rule.values.clear();
        })
    }

    /// Replace a rule's selected values verbatim.
    ///
    /// Values are not checked against the column's domain; a value that no
    /// longer occurs simply never matches.
    #[must_use]
    pub fn set_rule_values<I, S>(&self, id: RuleId, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        self.update(id, |rule| rule.values = values)
    }

    fn update(&self, id: RuleId, edit: impl FnOnce(&mut FilterRule)) -> Self {
        let mut next = self.clone();
        match next.rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => edit(rule),
            None => debug!(rule = %id, "ignoring edit of unknown filter rule"),
        }
        next
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&FilterRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn active_rules(&self) -> Vec<&FilterRule> {
        self.rules.iter().filter(|rule| rule.is_active()).collect()
    }

    /// Row membership: every active rule must match.
    pub fn matches(&self, row: &Record) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.is_active())
            .all(|rule| rule.matches(row))
    }

    /// Rows selected for export, in their original order.
    pub fn apply<'a>(&self, dataset: &'a SourceDataset) -> Vec<&'a Record> {
        if self.active_rules().is_empty() {
            return dataset.rows().iter().collect();
        }
        dataset
            .rows()
            .iter()
            .filter(|row| self.matches(row))
            .collect()
    }
}

/// String form of a cell for filter comparison. An absent cell is `""`.
pub fn cell_to_comparable(cell: Option<&CellValue>) -> String {
    cell.map(CellValue::to_comparable).unwrap_or_default()
}

/// Distinct non-empty values of `column`, in collation order.
///
/// Recomputed from the dataset on every call.
pub fn value_domain(dataset: &SourceDataset, column: &str) -> Vec<String> {
    let distinct: BTreeSet<String> = dataset
        .rows()
        .iter()
        .map(|row| cell_to_comparable(row.get(column)))
        .filter(|value| !value.is_empty())
        .collect();
    let mut values: Vec<String> = distinct.into_iter().collect();
    values.sort_by(|a, b| collate(a, b));
    values
}

/// Locale-style comparison: base letters first, then case, then the raw
/// string as tiebreak. `Č` sorts with `C`, not after `Z`.
fn collate(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Lowercased text with diacritics removed (NFD, combining marks dropped).
fn primary_key(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}
