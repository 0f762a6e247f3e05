#![allow(dead_code)]

use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::Cursor;

pub const HEADERS: [&str; 7] = [
    "SKCID",
    "规格属性",
    "*款式编码",
    "*颜色",
    "*尺码",
    "*图片编码",
    "*工艺",
];

/// Cell written into a fixture workbook.
pub enum Fixture<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial date shown as `yyyy-mm-dd`.
    Date(f64),
    Blank,
}

/// Build an `.xlsx` whose first sheet holds `rows`, header first, starting at
/// the given zero-based column.
pub fn workbook_bytes_at(first_col: u16, rows: &[Vec<Fixture<'_>>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(fixture_sheet("Products", first_col, rows));
    workbook.save_to_buffer().unwrap()
}

/// Build an `.xlsx` with one worksheet per `(name, rows)` pair, in order.
pub fn multi_sheet_bytes(sheets: &[(&str, Vec<Vec<Fixture<'_>>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        workbook.push_worksheet(fixture_sheet(name, 0, rows));
    }
    workbook.save_to_buffer().unwrap()
}

fn fixture_sheet(name: &str, first_col: u16, rows: &[Vec<Fixture<'_>>]) -> Worksheet {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name).unwrap();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, first_col + c as u16);
            match cell {
                Fixture::Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Fixture::Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Fixture::Date(serial) => {
                    worksheet
                        .write_number_with_format(r, c, *serial, &date_format)
                        .unwrap();
                }
                Fixture::Blank => {}
            }
        }
    }

    worksheet
}

pub fn workbook_bytes(rows: &[Vec<Fixture<'_>>]) -> Vec<u8> {
    workbook_bytes_at(0, rows)
}

pub fn header_row() -> Vec<Fixture<'static>> {
    HEADERS.iter().map(|h| Fixture::Text(*h)).collect()
}

/// Header plus three data rows; row 1 is the reference example.
pub fn sample_workbook() -> Vec<u8> {
    workbook_bytes(&[
        header_row(),
        vec![
            Fixture::Text("A2-20250703381-Navy-XL"),
            Fixture::Text("Navy/XL"),
        ],
        vec![Fixture::Text("A8-2025001-B"), Fixture::Text("Light-Red-M")],
        vec![Fixture::Text("plainid"), Fixture::Blank],
    ])
}

pub fn first_range(bytes: &[u8]) -> (String, Range<Data>) {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
    let name = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    (name, range)
}

/// Text of a cell by zero-based absolute position, empty when blank.
pub fn text_at(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
