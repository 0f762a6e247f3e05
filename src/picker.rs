use crate::sheet::Row;

/// Choose the identifier for a row.
///
/// The preferred column wins when it exists and holds a non-blank value;
/// otherwise the fallback column is used. Missing columns are not an error,
/// the result simply degrades to an empty string.
///
/// # Arguments
/// * `row` - The data row
/// * `preferred` - Header of the column to try first
/// * `fallback` - Header of the column used when the preferred one is blank
///
/// # Returns
/// * `String` - The trimmed identifier, possibly empty
///
/// # Examples
/// ```
/// use catalog_filler::header::HeaderMap;
/// use catalog_filler::picker::pick;
/// use catalog_filler::sheet::{CellValue, Row};
///
/// let headers = HeaderMap::resolve(&[CellValue::from("SKU货号"), CellValue::from("SKCID")]);
/// let cells = [CellValue::from("  "), CellValue::from("SKU1")];
/// assert_eq!(pick(&Row::new(&headers, &cells), "SKU货号", "SKCID"), "SKU1");
/// ```
pub fn pick(row: &Row<'_>, preferred: &str, fallback: &str) -> String {
    if let Some(value) = row.get(preferred) {
        if !value.is_blank() {
            return value.as_text().trim().to_string();
        }
    }

    row.get(fallback)
        .map(|value| value.as_text().trim().to_string())
        .unwrap_or_default()
}

/// [`pick`] with an optional preferred column.
pub fn pick_optional(row: &Row<'_>, preferred: Option<&str>, fallback: &str) -> String {
    match preferred {
        Some(preferred) => pick(row, preferred, fallback),
        None => pick(row, fallback, fallback),
    }
}
