use chrono::{Duration, NaiveDate};
use serde::{Serialize, Serializer};

use crate::header::HeaderMap;

static EMPTY: CellValue = CellValue::Empty;

/// A single scalar cell value as read from a workbook.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Excel serial date/time, kept numeric so it round-trips as a date.
    DateTime(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Textual view of the cell, as a user would read it.
    ///
    /// Whole numbers lose their fraction so numeric identifiers read back
    /// the way they were typed (`20250205010.0` -> `"20250205010"`).
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::DateTime(serial) => format_serial_date(*serial),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Empty, missing and whitespace-only text all count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            other => serializer.serialize_str(&other.as_text()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// Calendar text of an Excel 1900-system serial, time appended when present
fn format_serial_date(serial: f64) -> String {
    // 2958465 is 9999-12-31, the last date Excel can show
    if !serial.is_finite() || !(1.0..2_958_466.0).contains(&serial) {
        return format_number(serial);
    }
    // serials up to 60 predate the fictitious 1900-02-29
    let epoch = if serial < 61.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    };
    let Some(epoch) = epoch.and_then(|d| d.and_hms_opt(0, 0, 0)) else {
        return format_number(serial);
    };

    let millis = (serial * 86_400_000.0).round() as i64;
    let datetime = epoch + Duration::milliseconds(millis);
    if millis % 86_400_000 == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// In-memory grid for one worksheet.
///
/// Rows and columns are 1-based in the public API, matching spreadsheet
/// addressing; row 1 is the header row. Rows may be ragged, missing cells
/// read as [`CellValue::Empty`].
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from row-major cells, header row first.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Sheet {
            name: name.into(),
            rows,
        }
    }

    /// Number of rows, header included.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: u32, col: u16) -> &CellValue {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(&EMPTY)
    }

    /// Overwrite one cell, growing the grid as needed.
    ///
    /// Row and column are 1-based; zero is ignored.
    pub fn set(&mut self, row: u32, col: u16, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        let (r, c) = (row as usize - 1, col as usize - 1);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, CellValue::Empty);
        }
        cells[c] = value;
    }

    pub fn header_row(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rows below the header, in sheet order.
    pub fn data_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    /// All rows including the header.
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Read-only view of one data row, addressed by header text.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    headers: &'a HeaderMap,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    pub fn new(headers: &'a HeaderMap, cells: &'a [CellValue]) -> Self {
        Row { headers, cells }
    }

    /// Value under `header`, or `None` when the sheet has no such column.
    ///
    /// A known column past the end of a short row reads as `Empty`.
    pub fn get(&self, header: &str) -> Option<&'a CellValue> {
        let col = self.headers.position(header)?;
        Some(self.cells.get(col as usize - 1).unwrap_or(&EMPTY))
    }

    /// True when every cell of the row is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_read_without_fraction() {
        assert_eq!(CellValue::Number(20250205010.0).as_text(), "20250205010");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
        assert_eq!(CellValue::Bool(true).as_text(), "TRUE");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn dates_read_as_calendar_text() {
        assert_eq!(CellValue::DateTime(45841.0).as_text(), "2025-07-03");
        assert_eq!(CellValue::DateTime(45841.5).as_text(), "2025-07-03 12:00:00");
        assert_eq!(CellValue::DateTime(1.0).as_text(), "1900-01-01");
        assert!(!CellValue::DateTime(45841.0).is_blank());
    }

    #[test]
    fn set_grows_ragged_rows() {
        let mut sheet = Sheet::new("Sheet1");
        sheet.set(3, 4, CellValue::from("x"));
        assert_eq!(sheet.height(), 3);
        assert_eq!(sheet.width(), 4);
        assert_eq!(sheet.cell(3, 4), &CellValue::from("x"));
        assert_eq!(sheet.cell(1, 1), &CellValue::Empty);
        assert_eq!(sheet.cell(9, 9), &CellValue::Empty);
        assert_eq!(sheet.cell(0, 1), &CellValue::Empty);
    }

    #[test]
    fn row_lookup_by_header() {
        let header_cells = vec![CellValue::from("SKCID"), CellValue::from("规格属性")];
        let headers = HeaderMap::resolve(&header_cells);
        let cells = vec![CellValue::from("A2-1")];
        let row = Row::new(&headers, &cells);

        assert_eq!(row.get("SKCID"), Some(&CellValue::from("A2-1")));
        assert_eq!(row.get("规格属性"), Some(&CellValue::Empty));
        assert_eq!(row.get("nope"), None);
        assert!(!row.is_blank());
    }
}
