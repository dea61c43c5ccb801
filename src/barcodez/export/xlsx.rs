use crate::error::Result;
use crate::model::BarcodeRecord;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};

pub const SHEET_NAME: &str = "Barcodes";
const HEADER: [&str; 3] = ["Type", "Value", "Generated"];
const GENERATED_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Creation time as shown in the `Generated` column, in the local timezone.
pub fn generated_label(record: &BarcodeRecord) -> String {
    record
        .created_at
        .with_timezone(&Local)
        .format(GENERATED_FORMAT)
        .to_string()
}

/// A single `Barcodes` sheet: header row, then one row per record in order.
pub fn workbook(records: &[BarcodeRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, record.symbology.label())?;
        sheet.write_string(row, 1, &record.value)?;
        sheet.write_string(row, 2, generated_label(record))?;
    }

    sheet.set_column_width(1, 20)?;
    sheet.set_column_width(2, 22)?;

    Ok(workbook.save_to_buffer()?)
}
