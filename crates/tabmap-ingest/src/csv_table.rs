//! CSV readers for target schemas and source datasets.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::{debug, info};

use tabmap_model::{CellValue, Record, SourceDataset, TargetSchema};

use crate::error::{IngestError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn strip_bom(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}')
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Type a raw CSV cell.
///
/// Values with a leading zero such as `007` stay text so identifiers and
/// postal codes keep their digits.
pub fn parse_cell(raw: &str) -> CellValue {
    let value = normalize_cell(raw);
    if value.is_empty() {
        return CellValue::Missing;
    }
    if value.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    if let Some(number) = parse_number(value) {
        return CellValue::Number(number);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return CellValue::Date(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return CellValue::DateTime(datetime);
        }
    }
    CellValue::Text(value.to_string())
}

fn parse_number(value: &str) -> Option<f64> {
    if !value
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    if !value.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let digits = value.trim_start_matches(['+', '-']);
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read all rows that contain at least one non-blank cell.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|value| normalize_cell(value).is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read a target schema: the non-empty cells of the first non-blank row.
///
/// Names are kept as written apart from a leading byte-order mark, so the
/// exported header row matches the template exactly.
pub fn read_target_schema(path: &Path) -> Result<TargetSchema> {
    let rows = read_rows(path)?;
    let first = rows.first().ok_or_else(|| IngestError::EmptySchema {
        path: path.to_path_buf(),
    })?;
    let schema = TargetSchema::new(first.iter().map(|value| strip_bom(value))).map_err(
        |_| IngestError::EmptySchema {
            path: path.to_path_buf(),
        },
    )?;
    info!(
        path = %path.display(),
        columns = schema.len(),
        "read target schema"
    );
    Ok(schema)
}

/// Read a source dataset: a header row followed by typed records.
///
/// Columns with a blank header are skipped. A repeated header gets a
/// numeric suffix (`Name`, `Name_1`, ...) so every record key is unique.
pub fn read_source_dataset(path: &Path) -> Result<SourceDataset> {
    let rows = read_rows(path)?;
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };

    let columns = unique_headers(header_row);
    let mut records = Vec::with_capacity(data_rows.len());
    for row in data_rows {
        let record: Record = columns
            .iter()
            .map(|(idx, header)| {
                let cell = row.get(*idx).map_or(CellValue::Missing, |raw| parse_cell(raw));
                (header.clone(), cell)
            })
            .collect();
        records.push(record);
    }

    let headers: Vec<String> = columns.into_iter().map(|(_, header)| header).collect();
    if headers.is_empty() {
        debug!(path = %path.display(), "source header row has no named columns");
    }
    info!(
        path = %path.display(),
        columns = headers.len(),
        rows = records.len(),
        "read source dataset"
    );
    Ok(SourceDataset::new(headers, records))
}

/// Pair each named column with its index, deduplicating repeated names.
fn unique_headers(row: &[String]) -> Vec<(usize, String)> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut columns = Vec::with_capacity(row.len());
    for (idx, raw) in row.iter().enumerate() {
        let header = normalize_header(raw);
        if header.is_empty() {
            continue;
        }
        let count = seen.entry(header.clone()).or_insert(0);
        let name = if *count == 0 {
            header.clone()
        } else {
            format!("{header}_{count}")
        };
        *count += 1;
        columns.push((idx, name));
    }
    columns
}
