use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};

use crate::types::{AppError, AppResult};

/// Read one named column from the first worksheet of an XLSX workbook.
/// The first row of the sheet is the header.
pub fn read_column(content: &[u8], column: &str) -> AppResult<Vec<Option<String>>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(AppError::Io("Workbook contains no worksheets".to_string())),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string()).collect(),
        None => Vec::new(),
    };

    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| AppError::MissingColumn(column.to_string()))?;

    Ok(rows
        .map(|row| row.get(index).and_then(cell_text))
        .collect())
}

/// Text of a cell, or `None` for blank and error cells. Date cells render
/// as `YYYY-MM-DD HH:MM:SS` rather than their serial number.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => Some(
            cell.as_datetime()
                .map(|dt| dt.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
