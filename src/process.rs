use log::info;
use serde::Serialize;

use crate::config::Config;
use crate::downloader::to_xlsx;
use crate::error::FillError;
use crate::extract::RowNote;
use crate::loader::{LoadedWorkbook, from_excel_bytes};
use crate::sheet::{CellValue, Sheet};
use crate::writer::{FillReport, fill_sheet};

/// Result of processing one upload.
#[derive(Debug)]
pub struct ProcessedWorkbook {
    pub sheet: Sheet,
    pub report: FillReport,
    /// Sheets of the upload that were not processed and are not in the download.
    pub skipped_sheets: Vec<String>,
}

/// Table shown to the user before downloading.
#[derive(Debug, Serialize)]
pub struct Preview {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<PreviewRow>,
    pub total_rows: usize,
    pub flagged_rows: usize,
    pub skipped_rows: usize,
    pub skipped_sheets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewRow {
    pub row: u32,
    pub cells: Vec<CellValue>,
    pub notes: Vec<RowNote>,
    pub messages: Vec<&'static str>,
}

/// Load an uploaded workbook and fill its target columns.
///
/// Load, validate and transform happen in one pass over memory; nothing is
/// kept once the caller drops the result.
///
/// # Errors
/// * `FillError::MalformedInput` if the bytes are not a readable workbook
/// * `FillError::MissingSourceColumns` / `FillError::MissingTargetColumns`
///   if a required header is absent
pub fn process_workbook(bytes: &[u8], config: &Config) -> Result<ProcessedWorkbook, FillError> {
    let LoadedWorkbook {
        mut sheet,
        skipped_sheets,
    } = from_excel_bytes(bytes)?;
    let report = fill_sheet(&mut sheet, config)?;

    info!(
        "processed '{}': {} rows filled, {} flagged, {} blank",
        report.sheet_name,
        report.filled_count(),
        report.flagged_count(),
        report.skipped_rows
    );

    Ok(ProcessedWorkbook {
        sheet,
        report,
        skipped_sheets,
    })
}

impl ProcessedWorkbook {
    /// Serialize the processed sheet as `.xlsx` bytes.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, FillError> {
        to_xlsx(&self.sheet)
    }

    /// The first `limit` filled rows with their notes.
    pub fn preview(&self, limit: usize) -> Preview {
        let width = u16::try_from(self.sheet.width()).unwrap_or(u16::MAX);
        let headers = self
            .sheet
            .header_row()
            .iter()
            .map(CellValue::as_text)
            .collect();

        let rows = self
            .report
            .rows
            .iter()
            .take(limit)
            .map(|derived| PreviewRow {
                row: derived.row,
                cells: (1..=width)
                    .map(|c| self.sheet.cell(derived.row, c).clone())
                    .collect(),
                notes: derived.outcome.notes.clone(),
                messages: derived.outcome.notes.iter().map(RowNote::message).collect(),
            })
            .collect();

        Preview {
            sheet_name: self.report.sheet_name.clone(),
            headers,
            rows,
            total_rows: self.report.filled_count(),
            flagged_rows: self.report.flagged_count(),
            skipped_rows: self.report.skipped_rows,
            skipped_sheets: self.skipped_sheets.clone(),
        }
    }
}
