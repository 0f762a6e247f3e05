use log::{debug, warn};
use serde::Serialize;

use crate::config::{ColumnConfig, Config};
use crate::downloader::column_to_letter;
use crate::error::FillError;
use crate::extract::{RowOutcome, derive_fields};
use crate::header::{HeaderMap, TargetColumns};
use crate::picker::pick_optional;
use crate::sheet::{CellValue, Row, Sheet};

/// Derived values for one sheet row.
#[derive(Clone, Debug, Serialize)]
pub struct DerivedRow {
    /// 1-based sheet row; the header is row 1.
    pub row: u32,
    pub identifier: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

/// Summary of one fill pass.
#[derive(Clone, Debug, Serialize)]
pub struct FillReport {
    pub sheet_name: String,
    pub rows: Vec<DerivedRow>,
    /// Data rows left untouched because every cell was blank.
    pub skipped_rows: usize,
}

impl FillReport {
    pub fn filled_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows whose values include at least one fallback.
    pub fn flagged_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.outcome.is_clean()).count()
    }
}

/// Check that the spec and identifier headers exist.
///
/// The preferred identifier column is optional and never reported.
///
/// # Errors
/// * `FillError::MissingSourceColumns` naming every absent header
pub fn check_source_columns(headers: &HeaderMap, columns: &ColumnConfig) -> Result<(), FillError> {
    let missing = headers.missing(&[columns.spec.as_str(), columns.identifier.as_str()]);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FillError::MissingSourceColumns(missing))
    }
}

/// Derive the five values for every non-blank data row.
///
/// Pure with respect to the sheet: nothing is written here.
pub fn derive_rows(sheet: &Sheet, headers: &HeaderMap, config: &Config) -> (Vec<DerivedRow>, usize) {
    let columns = &config.columns;
    let mut derived = Vec::new();
    let mut skipped = 0;

    for (idx, cells) in sheet.data_rows().enumerate() {
        let row = Row::new(headers, cells);
        if row.is_blank() {
            skipped += 1;
            continue;
        }

        let identifier = pick_optional(
            &row,
            columns.preferred_identifier.as_deref(),
            &columns.identifier,
        );
        let spec = row
            .get(&columns.spec)
            .filter(|v| !v.is_blank())
            .map(CellValue::as_text);

        let outcome = derive_fields(&identifier, spec.as_deref(), &config.rules);
        // header is row 1, first data row is row 2
        let row_number = u32::try_from(idx + 2).unwrap_or(u32::MAX);
        if !outcome.is_clean() {
            debug!("row {}: {:?}", row_number, outcome.notes);
        }

        derived.push(DerivedRow {
            row: row_number,
            identifier,
            outcome,
        });
    }

    (derived, skipped)
}

/// Write derived values into their resolved target columns.
///
/// Only the five target cells of each derived row are overwritten; every
/// other cell keeps its value.
pub fn write(sheet: &mut Sheet, targets: &TargetColumns, rows: &[DerivedRow]) {
    for derived in rows {
        let values = derived.outcome.fields.as_array();
        for (col, value) in targets.as_array().into_iter().zip(values) {
            let cell = if value.is_empty() {
                CellValue::Empty
            } else {
                CellValue::from(value)
            };
            sheet.set(derived.row, col, cell);
        }
    }
}

/// Fill the five target columns of `sheet` in place.
///
/// Both header checks run before any cell is touched, so a failed fill
/// leaves the sheet exactly as it was.
///
/// # Arguments
/// * `sheet` - The uploaded sheet, header in row 1
/// * `config` - Column names and rule policies
///
/// # Returns
/// * `Result<FillReport, FillError>` - Per-row outcomes, or why nothing was written
///
/// # Errors
/// * `FillError::MissingSourceColumns` if the spec or identifier header is absent
/// * `FillError::MissingTargetColumns` if any of the five target headers is absent
pub fn fill_sheet(sheet: &mut Sheet, config: &Config) -> Result<FillReport, FillError> {
    let headers = HeaderMap::resolve(sheet.header_row());
    check_source_columns(&headers, &config.columns)?;
    let targets = TargetColumns::resolve(&headers, &config.columns.targets)?;

    debug!(
        "target columns: {}",
        targets
            .as_array()
            .iter()
            .map(|c| column_to_letter(*c))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let (rows, skipped_rows) = derive_rows(sheet, &headers, config);
    write(sheet, &targets, &rows);

    let report = FillReport {
        sheet_name: sheet.name.clone(),
        rows,
        skipped_rows,
    };

    if report.flagged_count() > 0 {
        warn!(
            "{} of {} rows in '{}' used fallback values",
            report.flagged_count(),
            report.filled_count(),
            report.sheet_name
        );
    }

    Ok(report)
}
