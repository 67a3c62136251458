//! Spreadsheet decoding tests.
//!
//! Workbooks are generated in memory so the cell types (numbers, booleans,
//! date-formatted serials, blanks) are exactly what a spreadsheet app writes.

use datavision::{CellValue, Decoder, FileDecoder, Formula, Period};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

/// Build a small sales sheet:
///
/// | region | amount | when                | active |
/// |--------|--------|---------------------|--------|
/// | North  | 10     | 2023-01-02          | true   |
/// |        |        |                     |        |
/// | South  |        | 2023-01-02 12:00:00 | false  |
/// | 42     | 2.5    |                     |        |
fn sales_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let day = ExcelDateTime::from_ymd(2023, 1, 2).unwrap();
    let noon = ExcelDateTime::from_ymd(2023, 1, 2)
        .unwrap()
        .and_hms(12, 0, 0)
        .unwrap();

    let sheet = workbook.add_worksheet();
    for (col, header) in ["region", "amount", "when", "active"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    sheet.write_string(1, 0, "North").unwrap();
    sheet.write_number(1, 1, 10.0).unwrap();
    sheet.write_datetime_with_format(1, 2, &day, &date_format).unwrap();
    sheet.write_boolean(1, 3, true).unwrap();

    sheet.write_string(3, 0, "South").unwrap();
    sheet
        .write_datetime_with_format(3, 2, &noon, &datetime_format)
        .unwrap();
    sheet.write_boolean(3, 3, false).unwrap();

    sheet.write_string(4, 0, "42").unwrap();
    sheet.write_number(4, 1, 2.5).unwrap();

    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_workbook_first_row_is_headers() {
    let table = FileDecoder::new()
        .decode(&sales_workbook(), "sales.xlsx")
        .unwrap();

    assert_eq!(table.headers, vec!["region", "amount", "when", "active"]);
    assert_eq!(table.source.as_ref().unwrap().format, "xlsx");
}

#[test]
fn test_workbook_blank_rows_are_skipped() {
    let table = FileDecoder::new()
        .decode(&sales_workbook(), "sales.xlsx")
        .unwrap();

    assert_eq!(table.row_count(), 3);
    let regions: Vec<&CellValue> = table.rows.iter().map(|r| &r["region"]).collect();
    assert_eq!(
        regions,
        vec![
            &CellValue::Text("North".into()),
            &CellValue::Text("South".into()),
            &CellValue::Number(42.0),
        ]
    );
}

#[test]
fn test_workbook_cell_typing() {
    let table = FileDecoder::new()
        .decode(&sales_workbook(), "sales.xlsx")
        .unwrap();
    let north = &table.rows[0];
    let south = &table.rows[1];
    let last = &table.rows[2];

    // Numbers stay numbers
    assert_eq!(north["amount"], CellValue::Number(10.0));
    assert_eq!(last["amount"], CellValue::Number(2.5));

    // Booleans become text
    assert_eq!(north["active"], CellValue::Text("true".into()));
    assert_eq!(south["active"], CellValue::Text("false".into()));

    // Dates render as text the period parser understands
    assert_eq!(north["when"], CellValue::Text("2023-01-02".into()));
    assert_eq!(south["when"], CellValue::Text("2023-01-02 12:00:00".into()));

    // Empty cells are absent
    assert!(south.get("amount").is_none());
    assert!(last.get("when").is_none());
    assert!(last.get("active").is_none());
}

#[test]
fn test_workbook_feeds_queries() {
    let service = datavision::DataVision::new();
    let (id, _) = service.upload(&sales_workbook(), "sales.xlsx").unwrap();

    let total = service
        .evaluate_formula(&id, Formula::Sum, "", "amount")
        .unwrap();
    assert_eq!(total.as_single(), Some(12.5));

    let days = service
        .aggregate_period(&id, "when", "amount", Period::Day)
        .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].period, "2023-01-02");
    assert_eq!(days[0].value, 10.0);
}
