use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use tabmap_ingest::{IngestError, parse_cell, read_source_dataset, read_target_schema};
use tabmap_model::CellValue;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn target_schema_uses_first_non_blank_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "template.csv", ",,\n\u{feff}Name, ,Email,\nignored,row\n");

    let schema = read_target_schema(&path).expect("schema");
    assert_eq!(schema.headers(), ["Name", "Email"]);
}

#[test]
fn target_names_keep_their_spacing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "template.csv", "\u{feff}Birth  Date,E-mail, Note \n");

    let schema = read_target_schema(&path).expect("schema");
    assert_eq!(schema.headers(), ["Birth  Date", "E-mail", " Note "]);
}

#[test]
fn blank_target_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "empty.csv", " , \n\n");

    let err = read_target_schema(&path).unwrap_err();
    assert!(matches!(err, IngestError::EmptySchema { .. }));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_source_dataset(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn empty_source_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "empty.csv", "");
    let err = read_source_dataset(&path).unwrap_err();
    assert!(matches!(err, IngestError::EmptyCsv { .. }));
}

#[test]
fn source_cells_are_typed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        &dir,
        "people.csv",
        "Full Name,Age,Active,Joined,Seen,Zip\n\
         Ana,41,TRUE,2023-06-01,2023-06-01 08:30,00811\n\
         Petr,,false\n",
    );

    let dataset = read_source_dataset(&path).expect("dataset");
    assert_eq!(
        dataset.headers(),
        ["Full Name", "Age", "Active", "Joined", "Seen", "Zip"]
    );
    assert_eq!(dataset.row_count(), 2);

    let ana = &dataset.rows()[0];
    assert_eq!(ana.get("Full Name"), Some(&CellValue::text("Ana")));
    assert_eq!(ana.get("Age"), Some(&CellValue::Number(41.0)));
    assert_eq!(ana.get("Active"), Some(&CellValue::Bool(true)));
    assert_eq!(
        ana.get("Joined"),
        Some(&CellValue::Date(
            NaiveDate::from_ymd_opt(2023, 6, 1).expect("date")
        ))
    );
    let seen = NaiveDateTime::parse_from_str("2023-06-01 08:30", "%Y-%m-%d %H:%M").expect("ts");
    assert_eq!(ana.get("Seen"), Some(&CellValue::DateTime(seen)));
    assert_eq!(ana.get("Zip"), Some(&CellValue::text("00811")));

    let petr = &dataset.rows()[1];
    assert_eq!(petr.get("Age"), Some(&CellValue::Missing));
    assert_eq!(petr.get("Active"), Some(&CellValue::Bool(false)));
    assert_eq!(petr.get("Zip"), Some(&CellValue::Missing));
}

#[test]
fn blank_rows_are_skipped_and_quotes_respected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        &dir,
        "quoted.csv",
        "Name,Note\n\n\"Doe, Jane\",\"said \"\"hi\"\"\"\n,\n",
    );

    let dataset = read_source_dataset(&path).expect("dataset");
    assert_eq!(dataset.row_count(), 1);
    let row = &dataset.rows()[0];
    assert_eq!(row.get("Name"), Some(&CellValue::text("Doe, Jane")));
    assert_eq!(row.get("Note"), Some(&CellValue::text("said \"hi\"")));
}

#[test]
fn header_only_file_has_no_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "headers.csv", "Name,Email\n");
    let dataset = read_source_dataset(&path).expect("dataset");
    assert_eq!(dataset.headers(), ["Name", "Email"]);
    assert!(dataset.is_empty());
}

#[test]
fn datetime_with_seconds() {
    let expected =
        NaiveDateTime::parse_from_str("2024-01-02T03:04:05", "%Y-%m-%dT%H:%M:%S").expect("ts");
    assert_eq!(parse_cell("2024-01-02T03:04:05"), CellValue::DateTime(expected));
    assert_eq!(parse_cell("  "), CellValue::Missing);
    assert_eq!(parse_cell("2024-13-40"), CellValue::text("2024-13-40"));
}
