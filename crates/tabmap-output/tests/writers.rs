use std::fs;

use chrono::NaiveDate;

use tabmap_model::{CellValue, Table};
use tabmap_output::{OutputFormat, write_csv, write_table};

fn sample() -> Table {
    let mut table = Table::new(vec!["Name".into(), "Age".into(), "Joined".into(), "Note".into()]);
    table
        .push_row(vec![
            CellValue::text("Ana"),
            CellValue::Number(41.0),
            CellValue::Date(NaiveDate::from_ymd_opt(2023, 6, 1).expect("date")),
            CellValue::text("likes \"tea\", coffee"),
        ])
        .expect("row");
    table
        .push_row(vec![
            CellValue::text("Ben"),
            CellValue::Number(2.5),
            CellValue::Missing,
            CellValue::Bool(true),
        ])
        .expect("row");
    table
}

#[test]
fn csv_output() {
    let mut buffer = Vec::new();
    write_csv(&sample(), &mut buffer).expect("write csv");
    let text = String::from_utf8(buffer).expect("utf8");
    insta::assert_snapshot!(text, @r#"
    Name,Age,Joined,Note
    Ana,41,2023-06-01,"likes ""tea"", coffee"
    Ben,2.5,,true
    "#);
}

#[test]
fn header_only_csv() {
    let mut buffer = Vec::new();
    write_csv(&Table::new(vec!["Name".into()]), &mut buffer).expect("write csv");
    assert_eq!(String::from_utf8(buffer).expect("utf8"), "Name\n");
}

#[test]
fn write_table_creates_the_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("nested").join("out");

    let path = write_table(&sample(), OutputFormat::Csv, &out).expect("write");
    assert_eq!(path, out.join("mapped_output.csv"));
    assert!(fs::read_to_string(&path).expect("read").starts_with("Name,Age"));
}

#[test]
fn workbook_is_a_zip_package() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_table(&sample(), OutputFormat::Workbook, dir.path()).expect("write");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("mapped_output.xlsx"));

    let bytes = fs::read(&path).expect("read");
    assert!(bytes.starts_with(b"PK"));
}
