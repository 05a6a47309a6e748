use cane_core::domain::WeighRecord;
use cane_core::pricing::STANDARD_SCHEDULE;

/// A plain record with the given slip date, net weight, and timestamp.
pub fn record(date: &str, net_weight_kg: f64, timestamp: i64) -> WeighRecord {
    let mut record = WeighRecord::new("10234", date, "09:41", net_weight_kg, timestamp);
    record.license_plate = "82-1234 ขก".into();
    record.vendor_name = "สมชาย ใจดี".into();
    record
}

/// Same, with a moisture reading applied through the standard schedule.
#[allow(dead_code)]
pub fn priced_record(date: &str, net_weight_kg: f64, moisture: f64, timestamp: i64) -> WeighRecord {
    let mut record = record(date, net_weight_kg, timestamp);
    record.set_moisture(moisture, &STANDARD_SCHEDULE);
    record
}
