use calamine::{Data, Reader, Xlsx};
use log::{debug, warn};
use std::io::Cursor;

use crate::error::FillError;
use crate::sheet::{CellValue, Sheet};

/// The loaded worksheet and the names of the sheets left behind.
#[derive(Debug)]
pub struct LoadedWorkbook {
    pub sheet: Sheet,
    /// Every worksheet after the first; these are not processed and do not
    /// appear in the download.
    pub skipped_sheets: Vec<String>,
}

/// Load the first worksheet of an uploaded workbook
///
/// The upload never touches the filesystem: calamine reads straight from
/// the in-memory bytes. Cells keep their absolute position, so a sheet whose
/// used range starts below row 1 or right of column A is placed where the
/// user sees it.
///
/// # Arguments
/// * `bytes` - Raw `.xlsx` file content
///
/// # Returns
/// * `Result<LoadedWorkbook, FillError>` - The loaded sheet or an error
///
/// # Errors
/// * `FillError::MalformedInput` if the bytes are not a workbook, it has no
///   worksheet, or the first worksheet is empty
pub fn from_excel_bytes(bytes: &[u8]) -> Result<LoadedWorkbook, FillError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;

    let mut sheet_names = workbook.sheet_names().into_iter();
    let sheet_name = sheet_names
        .next()
        .ok_or_else(|| FillError::MalformedInput("no sheets found in workbook".to_string()))?;
    let skipped_sheets: Vec<String> = sheet_names.collect();
    if !skipped_sheets.is_empty() {
        warn!(
            "only worksheet '{}' is processed; dropping {} other sheet(s): {}",
            sheet_name,
            skipped_sheets.len(),
            skipped_sheets.join(", ")
        );
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FillError::MalformedInput("failed to get worksheet".to_string()))??;

    let Some((start_row, start_col)) = range.start() else {
        return Err(FillError::MalformedInput(format!(
            "worksheet '{}' is empty",
            sheet_name
        )));
    };

    let mut sheet = Sheet::new(sheet_name);

    for (r, row) in range.rows().enumerate() {
        let row_idx = start_row as usize + r + 1;
        let row_idx = u32::try_from(row_idx)
            .map_err(|_| FillError::MalformedInput("too many rows".to_string()))?;

        for (c, cell) in row.iter().enumerate() {
            let value = to_cell_value(cell);
            if value == CellValue::Empty {
                continue;
            }
            let col_idx = u16::try_from(start_col as usize + c + 1)
                .map_err(|_| FillError::MalformedInput("too many columns".to_string()))?;
            sheet.set(row_idx, col_idx, value);
        }
    }

    if sheet.header_row().iter().all(CellValue::is_blank) {
        return Err(FillError::MalformedInput(format!(
            "worksheet '{}' has no header row",
            sheet.name
        )));
    }

    debug!(
        "loaded worksheet '{}' with {} rows x {} columns",
        sheet.name,
        sheet.height(),
        sheet.width()
    );

    Ok(LoadedWorkbook {
        sheet,
        skipped_sheets,
    })
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) => CellValue::DateTime(d.as_f64()),
        // ISO date strings and error cells are carried as their display text
        other => CellValue::Text(other.to_string()),
    }
}
