use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use tabmap_model::{CellValue, Table};

use crate::error::{OutputError, Result};

const SHEET_NAME: &str = "Mapped";
const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Write the table to a single-sheet workbook with a bold header row.
///
/// Numbers, booleans and dates keep their native cell types.
pub fn write_workbook(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (idx, header) in table.headers.iter().enumerate() {
            sheet.write_string_with_format(0, column_index(idx)?, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = row_index(row_idx + 1)?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = column_index(col_idx)?;
                write_cell(sheet, row_num, col_num, cell, &date_format, &datetime_format)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &CellValue,
    date_format: &Format,
    datetime_format: &Format,
) -> Result<()> {
    match cell {
        CellValue::Missing => {}
        CellValue::Text(value) => {
            sheet.write_string(row, col, value)?;
        }
        CellValue::Number(value) if value.is_finite() => {
            sheet.write_number(row, col, *value)?;
        }
        CellValue::Number(_) => {
            sheet.write_string(row, col, cell.to_comparable())?;
        }
        CellValue::Bool(value) => {
            sheet.write_boolean(row, col, *value)?;
        }
        CellValue::Date(value) => {
            sheet.write_datetime_with_format(row, col, value, date_format)?;
        }
        CellValue::DateTime(value) => {
            sheet.write_datetime_with_format(row, col, value, datetime_format)?;
        }
    }
    Ok(())
}

fn row_index(idx: usize) -> Result<RowNum> {
    RowNum::try_from(idx).map_err(|_| OutputError::TooManyRows { rows: idx })
}

fn column_index(idx: usize) -> Result<ColNum> {
    ColNum::try_from(idx).map_err(|_| OutputError::TooManyColumns { columns: idx + 1 })
}
