mod common;

use calamine::Data;
use catalog_filler::config::{Config, StyleCodePolicy};
use catalog_filler::{FillError, RowNote, process_workbook};
use common::*;

#[test]
fn reference_rows_round_trip_through_xlsx() {
    let processed = process_workbook(&sample_workbook(), &Config::default()).unwrap();
    let bytes = processed.to_xlsx().unwrap();
    let (name, range) = first_range(&bytes);

    assert_eq!(name, "Products");
    let row1: Vec<String> = (0..7).map(|c| text_at(&range, 1, c)).collect();
    assert_eq!(
        row1,
        [
            "A2-20250703381-Navy-XL",
            "Navy/XL",
            "A2",
            "Navy",
            "XL",
            "20250703381",
            "白墨烫画"
        ]
    );

    let row2: Vec<String> = (2..7).map(|c| text_at(&range, 2, c)).collect();
    assert_eq!(row2, ["A8", "Light-Red", "M", "2025001", "白墨烫画"]);

    let row3: Vec<String> = (2..7).map(|c| text_at(&range, 3, c)).collect();
    assert_eq!(row3, ["A2", "", "", "plainid", "白墨烫画"]);

    // header row is preserved as is
    let header: Vec<String> = (0..7).map(|c| text_at(&range, 0, c)).collect();
    assert_eq!(header, HEADERS);
}

#[test]
fn fallback_rows_are_reported() {
    let processed = process_workbook(&sample_workbook(), &Config::default()).unwrap();
    let report = &processed.report;

    assert_eq!(report.filled_count(), 3);
    assert_eq!(report.flagged_count(), 1);
    assert_eq!(report.rows[2].row, 4);
    assert_eq!(
        report.rows[2].outcome.notes,
        vec![
            RowNote::StyleCodeDefaulted,
            RowNote::ImageCodeUnparsed,
            RowNote::MissingSpec
        ]
    );

    let preview = processed.preview(2);
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.total_rows, 3);
    assert_eq!(preview.headers, HEADERS);
}

#[test]
fn reordered_target_columns_follow_headers() {
    let bytes = workbook_bytes(&[
        vec![
            Fixture::Text("*工艺"),
            Fixture::Text("*图片编码"),
            Fixture::Text("规格属性"),
            Fixture::Text("*尺码"),
            Fixture::Text("店铺"),
            Fixture::Text("*颜色"),
            Fixture::Text("SKCID"),
            Fixture::Text("*款式编码"),
        ],
        vec![
            Fixture::Blank,
            Fixture::Blank,
            Fixture::Text("Black/S"),
            Fixture::Blank,
            Fixture::Text("Shop 1"),
            Fixture::Blank,
            Fixture::Text("A820250603048-B-Black-S"),
        ],
    ]);

    let processed = process_workbook(&bytes, &Config::default()).unwrap();
    let (_, range) = first_range(&processed.to_xlsx().unwrap());

    assert_eq!(text_at(&range, 1, 0), "白墨烫画");
    assert_eq!(text_at(&range, 1, 1), "A820250603048");
    assert_eq!(text_at(&range, 1, 3), "S");
    assert_eq!(text_at(&range, 1, 4), "Shop 1");
    assert_eq!(text_at(&range, 1, 5), "Black");
    assert_eq!(text_at(&range, 1, 7), "A8");
}

#[test]
fn numeric_identifiers_and_offset_sheets() {
    let bytes = workbook_bytes_at(
        2,
        &[
            header_row(),
            vec![Fixture::Number(20250205010.0), Fixture::Text("White-L")],
        ],
    );

    let processed = process_workbook(&bytes, &Config::default()).unwrap();
    let (_, range) = first_range(&processed.to_xlsx().unwrap());

    // columns A and B stay empty, the table still starts at column C
    assert_eq!(text_at(&range, 0, 2), "SKCID");
    assert_eq!(text_at(&range, 1, 5), "White");
    assert_eq!(text_at(&range, 1, 6), "L");
    assert_eq!(text_at(&range, 1, 7), "20250205010");
}

#[test]
fn date_columns_stay_dates_in_the_download() {
    let mut header = header_row();
    header.push(Fixture::Text("上架日期"));
    let bytes = workbook_bytes(&[
        header,
        vec![
            Fixture::Text("A2-20250703381-Navy-XL"),
            Fixture::Text("Navy/XL"),
            Fixture::Blank,
            Fixture::Blank,
            Fixture::Blank,
            Fixture::Blank,
            Fixture::Blank,
            Fixture::Date(45841.0),
        ],
    ]);

    let processed = process_workbook(&bytes, &Config::default()).unwrap();
    let preview = processed.preview(1);
    assert_eq!(preview.headers[7], "上架日期");
    assert_eq!(preview.rows[0].cells[7].as_text(), "2025-07-03");

    let (_, range) = first_range(&processed.to_xlsx().unwrap());
    match range.get_value((1, 7)) {
        Some(Data::DateTime(d)) => assert_eq!(d.as_f64(), 45841.0),
        other => panic!("expected a date cell, got {:?}", other),
    }
    assert_eq!(text_at(&range, 1, 2), "A2");
}

#[test]
fn only_the_first_sheet_is_processed() {
    let bytes = multi_sheet_bytes(&[
        (
            "Products",
            vec![
                header_row(),
                vec![Fixture::Text("A8-2025001-B"), Fixture::Text("Light-Red-M")],
            ],
        ),
        ("Notes", vec![vec![Fixture::Text("internal")]]),
        ("Archive", vec![header_row()]),
    ]);

    let processed = process_workbook(&bytes, &Config::default()).unwrap();
    assert_eq!(processed.skipped_sheets, ["Notes", "Archive"]);
    assert_eq!(processed.preview(10).skipped_sheets, ["Notes", "Archive"]);
    assert_eq!(processed.report.filled_count(), 1);

    let (name, range) = first_range(&processed.to_xlsx().unwrap());
    assert_eq!(name, "Products");
    assert_eq!(text_at(&range, 1, 2), "A8");
}

#[test]
fn single_sheet_skips_nothing() {
    let processed = process_workbook(&sample_workbook(), &Config::default()).unwrap();
    assert!(processed.skipped_sheets.is_empty());
}

#[test]
fn digit_run_policy_from_config() {
    let mut config = Config::default();
    config.rules.style_code = StyleCodePolicy::DigitRun;

    let processed = process_workbook(&sample_workbook(), &config).unwrap();
    assert_eq!(processed.report.rows[0].outcome.fields.style_code, "A2");
    assert_eq!(processed.report.rows[1].outcome.fields.style_code, "A8");
}

#[test]
fn missing_target_header_aborts() {
    let bytes = workbook_bytes(&[
        HEADERS[..6].iter().map(|h| Fixture::Text(*h)).collect(),
        vec![Fixture::Text("A2-1-X"), Fixture::Text("Red/M")],
    ]);

    match process_workbook(&bytes, &Config::default()) {
        Err(FillError::MissingTargetColumns(names)) => assert_eq!(names, vec!["*工艺"]),
        other => panic!("expected MissingTargetColumns, got {:?}", other.map(|p| p.report)),
    }
}

#[test]
fn missing_source_header_is_reported_first() {
    let bytes = workbook_bytes(&[vec![Fixture::Text("SKCID"), Fixture::Text("*颜色")]]);

    let err = process_workbook(&bytes, &Config::default()).unwrap_err();
    assert!(matches!(err, FillError::MissingSourceColumns(ref names) if names == &["规格属性"]));
    assert_eq!(err.to_string(), "missing source columns: 规格属性");
}

#[test]
fn unreadable_upload_is_malformed() {
    let err = process_workbook(b"PK\x03\x04 not really a zip", &Config::default()).unwrap_err();
    assert!(matches!(err, FillError::MalformedInput(_)));
}
