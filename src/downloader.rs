use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::FillError;
use crate::sheet::{CellValue, Sheet};

/// MIME type of the processed download.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File name offered to the browser for the processed download.
pub const DOWNLOAD_FILENAME: &str = "filled_excel.xlsx";

/// Convert a sheet to XLSX format
///
/// Writes every non-empty cell with its own type (text, number, date,
/// boolean); the header row is bold. Styles of the uploaded workbook are not carried
/// over.
///
/// # Arguments
/// * `sheet` - Reference to the sheet to convert
///
/// # Returns
/// * `Result<Vec<u8>, FillError>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```
/// use catalog_filler::downloader::to_xlsx;
/// use catalog_filler::sheet::{CellValue, Sheet};
///
/// let sheet = Sheet::from_rows("Sheet1", vec![vec![CellValue::from("SKCID")]]);
/// let xlsx_data = to_xlsx(&sheet).unwrap();
/// assert!(!xlsx_data.is_empty());
/// ```
pub fn to_xlsx(sheet: &Sheet) -> Result<Vec<u8>, FillError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    if !sheet.name.trim().is_empty() {
        worksheet.set_name(&sheet.name)?;
    }

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (r, row) in sheet.rows().enumerate() {
        let r = u32::try_from(r).map_err(|_| FillError::Unexpected("too many rows".to_string()))?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c)
                .map_err(|_| FillError::Unexpected("too many columns".to_string()))?;
            match cell {
                CellValue::Text(s) if r == 0 => {
                    worksheet.write_string_with_format(r, c, s, &header_format)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                CellValue::DateTime(serial) => {
                    let format = if serial.fract() == 0.0 {
                        &date_format
                    } else {
                        &datetime_format
                    };
                    worksheet.write_number_with_format(r, c, *serial, format)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Convert column number to letter (A=1, B=2, etc.)
///
/// # Examples
/// ```
/// use catalog_filler::downloader::column_to_letter;
///
/// assert_eq!(column_to_letter(1), "A");
/// assert_eq!(column_to_letter(26), "Z");
/// assert_eq!(column_to_letter(27), "AA");
/// assert_eq!(column_to_letter(52), "AZ");
/// ```
pub fn column_to_letter(col: u16) -> String {
    let mut name = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    name
}
