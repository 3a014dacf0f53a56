#![deny(unsafe_code)]

use std::collections::BTreeMap;

use crate::{CellValue, ModelError};

/// Ordered list of output column names.
///
/// Built once from the first row of a target file. Blank names are dropped
/// and the remaining names are kept verbatim, spacing included; order fixes
/// the column order of every exported table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSchema {
    headers: Vec<String>,
}

impl TargetSchema {
    pub fn new<I, S>(headers: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .filter(|header| !header.as_ref().trim().is_empty())
            .map(|header| header.as_ref().to_string())
            .collect();
        if headers.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        Ok(Self { headers })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Always false for a constructed schema; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn contains(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }
}

/// One source row, keyed by source header.
///
/// Headers absent from the map are treated the same as `Missing` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.insert(header.into(), value);
    }

    /// Builder-style insert used by tests and small fixtures.
    #[must_use]
    pub fn with(mut self, header: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(header, value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Uploaded source rows plus their header list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceDataset {
    headers: Vec<String>,
    rows: Vec<Record>,
}

impl SourceDataset {
    pub fn new(headers: Vec<String>, rows: Vec<Record>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}
