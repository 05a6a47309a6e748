//! Delimited-text export of the record book.
//!
//! Produces the spreadsheet hand-off file: fixed column order, Thai headers,
//! and a UTF-8 BOM so Excel renders the Thai text without prompting.

use std::io::Write;

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::domain::WeighRecord;
use crate::errors::Result;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Fixed column order: date, time, ticket number, plate, net weight,
/// moisture, price per ton, total value.
const HEADERS: [&str; 8] = [
    "วันที่",
    "เวลา",
    "เลขที่ใบชั่ง",
    "ทะเบียนรถ",
    "น้ำหนักสุทธิ (กก.)",
    "ความชื้น (%)",
    "ราคา/ตัน (บาท)",
    "มูลค่ารวม (บาท)",
];

/// Writes the record set as CSV, BOM first.
pub fn write_csv<W: Write>(records: &[WeighRecord], mut writer: W) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for record in records {
        csv_writer.write_record(&[
            record.date.clone(),
            record.time.clone(),
            record.ticket_number.clone(),
            record.license_plate.clone(),
            format_number(record.net_weight_kg),
            record.moisture.map(format_number).unwrap_or_default(),
            record.cane_price.map(format_number).unwrap_or_default(),
            record.total_value.map(format_number).unwrap_or_default(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// The full export as an in-memory string.
pub fn export_string(records: &[WeighRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| crate::errors::CoreError::StorageError(err.to_string()))
}

/// Suggested file name for an export created on `today`.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("cane_tracking_export_{}.csv", today.format("%Y-%m-%d"))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
