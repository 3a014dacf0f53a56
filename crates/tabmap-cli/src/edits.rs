//! Mapping and filter edits given on the `export` command line.
//!
//! Edits run against a [`Session`] in a fixed order: `--reset`, `--unmap`,
//! `--map`, `--literal`, then `--filter`. An edit that names an unknown
//! column or a source column owned by another target is skipped with a
//! warning and the remaining edits still apply.

use clap::Args;
use tracing::{debug, warn};

use tabmap_core::Session;
use tabmap_model::SourceDataset;

use crate::logging::redact_value;
use crate::pairs::{FilterArg, parse_assignment_pair, parse_filter_arg};

#[derive(Debug, Clone, Default, Args)]
pub struct MappingEdits {
    /// Fill a target column from a source column.
    #[arg(long = "map", value_name = "TARGET=SOURCE", value_parser = parse_assignment_pair)]
    pub map: Vec<(String, String)>,

    /// Fill a target column with a fixed value (an empty value clears it).
    #[arg(long = "literal", value_name = "TARGET=VALUE", value_parser = parse_assignment_pair)]
    pub literal: Vec<(String, String)>,

    /// Unassign a target column.
    #[arg(long = "unmap", value_name = "TARGET")]
    pub unmap: Vec<String>,

    /// Unassign every column before applying --map and --literal.
    #[arg(long = "reset")]
    pub reset: bool,

    /// Keep only rows whose COLUMN equals one of the listed values.
    #[arg(long = "filter", value_name = "COLUMN=V1,V2", value_parser = parse_filter_arg)]
    pub filter: Vec<FilterArg>,
}

/// An edit that was not applied as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkippedEdit {
    /// `--map`, `--literal` or `--unmap` named a column missing from the target.
    UnknownTarget { flag: &'static str, column: String },
    /// `--map` named a column missing from the source.
    UnknownSource { column: String, source: String },
    /// `--map` asked for a source column that already feeds another target.
    SourceInUse {
        column: String,
        source: String,
        mapped_to: String,
    },
    /// `--filter` named a column missing from the source. The rule is still
    /// added and matches no row that lacks the column.
    UnknownFilterColumn { column: String },
}

impl MappingEdits {
    /// Apply the mapping edits to `session`; `dataset` is the source that
    /// `--map` is checked against.
    pub fn apply_mapping(&self, session: &mut Session, dataset: &SourceDataset) -> Vec<SkippedEdit> {
        let mut skipped = Vec::new();
        if self.reset {
            session.reset_mapping();
        }
        for column in &self.unmap {
            if !session.mapping().has_column(column) {
                skipped.push(unknown_target("--unmap", column));
                continue;
            }
            session.clear(column);
        }
        for (column, source) in &self.map {
            if !session.mapping().has_column(column) {
                skipped.push(unknown_target("--map", column));
                continue;
            }
            if !dataset.has_header(source) {
                warn!(column = %column, source = %source, "--map names an unknown source column");
                skipped.push(SkippedEdit::UnknownSource {
                    column: column.clone(),
                    source: source.clone(),
                });
                continue;
            }
            if session.mapping().assignment(column).source_header() == Some(source.as_str()) {
                continue;
            }
            if !session.assign_from_source(column, source) {
                let mapped_to = session
                    .mapping()
                    .mapped_target_for(source)
                    .unwrap_or_default()
                    .to_string();
                warn!(
                    column = %column,
                    source = %source,
                    mapped_to = %mapped_to,
                    "source column is already mapped, clear it first"
                );
                skipped.push(SkippedEdit::SourceInUse {
                    column: column.clone(),
                    source: source.clone(),
                    mapped_to,
                });
            }
        }
        for (column, text) in &self.literal {
            if !session.mapping().has_column(column) {
                skipped.push(unknown_target("--literal", column));
                continue;
            }
            session.assign_literal(column, text);
            debug!(column = %column, value = redact_value(text), "literal value set");
        }
        skipped
    }

    /// Add one filter rule per `--filter`, checked against the loaded source.
    pub fn apply_filters(&self, session: &mut Session) -> Vec<SkippedEdit> {
        let mut skipped = Vec::new();
        for filter in &self.filter {
            let known = session
                .source()
                .is_some_and(|dataset| dataset.has_header(&filter.column));
            if !known {
                warn!(column = %filter.column, "--filter names an unknown source column");
                skipped.push(SkippedEdit::UnknownFilterColumn {
                    column: filter.column.clone(),
                });
            }
            let rule = session.add_filter_rule();
            session.set_filter_column(rule, &filter.column);
            session.set_filter_values(rule, filter.values.iter().cloned());
            for value in &filter.values {
                debug!(rule = %rule, value = redact_value(value), "filter value selected");
            }
        }
        skipped
    }
}

fn unknown_target(flag: &'static str, column: &str) -> SkippedEdit {
    warn!(column = %column, "{flag} names an unknown target column");
    SkippedEdit::UnknownTarget {
        flag,
        column: column.to_string(),
    }
}
