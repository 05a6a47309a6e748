//! Remote spreadsheet sync.
//!
//! The core does not know the transport. It hands a plain-data projection of
//! a record to a [`RemoteSync`] implementation and records the confirmation;
//! on fetch it receives loosely-shaped rows and merge-replaces the local
//! book. Total sync failure is never fatal: the local copy stays
//! authoritative and the caller surfaces the failure to the user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::thai_display_date;
use crate::domain::record::{DEFAULT_PRODUCT, MISSING_TEXT};
use crate::domain::{RecordBook, WeighRecord};

/// Plain-data projection of a record in the shape the sheet backend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    pub id: String,
    pub ticket_number: String,
    pub date: String,
    pub time: String,
    pub net_weight_kg: f64,
    pub gross_weight_kg: f64,
    pub tare_weight_kg: f64,
    pub license_plate: String,
    pub vendor_name: String,
    pub product_name: String,
    pub goal_target: f64,
    pub goal_round: u32,
    pub moisture: f64,
    pub cane_price: f64,
    pub total_value: f64,
    #[serde(default)]
    pub image_base64: String,
}

impl SyncPayload {
    /// Projects a record for upload. Missing numerics flatten to zero,
    /// missing goal attribution to round 1, and the image keeps only its raw
    /// base64 body (no data-URL header).
    pub fn from_record(record: &WeighRecord) -> Self {
        Self {
            id: record.id.clone(),
            ticket_number: record.ticket_number.clone(),
            date: record.date.clone(),
            time: record.time.clone(),
            net_weight_kg: record.net_weight_kg,
            gross_weight_kg: record.gross_weight_kg.unwrap_or(0.0),
            tare_weight_kg: record.tare_weight_kg.unwrap_or(0.0),
            license_plate: record.license_plate.clone(),
            vendor_name: record.vendor_name.clone(),
            product_name: record.product_name.clone(),
            goal_target: record.goal_target.unwrap_or(0.0),
            goal_round: record.goal_round.unwrap_or(1),
            moisture: record.moisture.unwrap_or(0.0),
            cane_price: record.cane_price.unwrap_or(0.0),
            total_value: record.total_value.unwrap_or(0.0),
            image_base64: record
                .image_ref
                .as_deref()
                .and_then(strip_data_url_header)
                .unwrap_or_default(),
        }
    }
}

/// One outbound change for the remote sheet.
#[derive(Debug, Clone)]
pub enum SyncChange {
    Create(SyncPayload),
    Update(SyncPayload),
    Delete { ticket_number: String },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("remote rejected the change: {0}")]
    Rejected(String),
}

/// Transport collaborator. Implementations own retries and wire formatting;
/// the core fires a change and reads back the confirmation.
pub trait RemoteSync {
    fn push(&self, change: SyncChange) -> Result<(), SyncError>;
    fn fetch(&self) -> Result<Vec<RemoteRow>, SyncError>;
}

/// A row as it comes back from the sheet: every field optional, numerics
/// possibly strings with thousands separators.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteRow {
    pub id: Option<String>,
    pub ticket_number: Option<Value>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub net_weight_kg: Option<Value>,
    pub gross_weight_kg: Option<Value>,
    pub tare_weight_kg: Option<Value>,
    pub license_plate: Option<String>,
    pub vendor_name: Option<String>,
    pub product_name: Option<String>,
    pub goal_target: Option<Value>,
    pub goal_round: Option<Value>,
    pub moisture: Option<Value>,
    pub cane_price: Option<Value>,
    pub total_value: Option<Value>,
    pub image_url: Option<String>,
    pub timestamp: Option<Value>,
}

impl RemoteRow {
    /// Coerces a loose row into a complete record.
    ///
    /// `index` seeds a synthetic id for rows that never had one; `now_ms`
    /// backfills a missing timestamp.
    pub fn into_record(self, index: usize, now_ms: i64) -> WeighRecord {
        let gross = lenient_number(self.gross_weight_kg.as_ref());
        let tare = lenient_number(self.tare_weight_kg.as_ref());
        let moisture = lenient_number(self.moisture.as_ref());
        let cane_price = lenient_number(self.cane_price.as_ref());
        let total_value = lenient_number(self.total_value.as_ref());
        let goal_target = lenient_number(self.goal_target.as_ref());
        let goal_round = lenient_number(self.goal_round.as_ref()) as u32;

        WeighRecord {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("sheet-{index}-{now_ms}")),
            ticket_number: self
                .ticket_number
                .as_ref()
                .map(value_to_text)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| MISSING_TEXT.into()),
            date: normalize_sheet_date(self.date.as_deref()),
            time: normalize_sheet_time(self.time.as_deref()),
            net_weight_kg: lenient_number(self.net_weight_kg.as_ref()),
            gross_weight_kg: (gross > 0.0).then_some(gross),
            tare_weight_kg: (tare > 0.0).then_some(tare),
            license_plate: non_empty_or(self.license_plate, MISSING_TEXT),
            vendor_name: non_empty_or(self.vendor_name, MISSING_TEXT),
            product_name: non_empty_or(self.product_name, DEFAULT_PRODUCT),
            image_ref: self.image_url.as_deref().and_then(normalize_image_ref),
            timestamp: lenient_timestamp(self.timestamp.as_ref()).unwrap_or(now_ms),
            goal_target: (goal_target > 0.0).then_some(goal_target),
            goal_round: Some(goal_round.max(1)),
            moisture: (moisture > 0.0).then_some(moisture),
            cane_price: (cane_price > 0.0).then_some(cane_price),
            total_value: (total_value > 0.0).then_some(total_value),
        }
    }
}

pub struct SyncService;

impl SyncService {
    /// Fires one change at the remote, tolerating total failure.
    ///
    /// Returns whether the remote confirmed. A failure is logged and left to
    /// the caller to surface; nothing is retried here.
    pub fn push(remote: &dyn RemoteSync, change: SyncChange) -> bool {
        match remote.push(change) {
            Ok(()) => true,
            Err(err) => {
                warn!("remote sync push failed, local copy stays authoritative: {err}");
                false
            }
        }
    }

    /// Fetches remote rows and merge-replaces the local book.
    ///
    /// An empty remote result leaves the local book untouched. Returns the
    /// number of records installed.
    pub fn refresh(
        book: &mut RecordBook,
        remote: &dyn RemoteSync,
        now: DateTime<Utc>,
    ) -> Result<usize, SyncError> {
        let rows = remote.fetch()?;
        if rows.is_empty() {
            info!("remote sheet reachable but empty, keeping local records");
            return Ok(0);
        }
        let now_ms = now.timestamp_millis();
        let records: Vec<WeighRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| row.into_record(index, now_ms))
            .collect();
        let count = records.len();
        book.replace_all(records, now);
        info!(count, "installed records from remote sheet");
        Ok(count)
    }
}

fn strip_data_url_header(image_ref: &str) -> Option<String> {
    let raw = image_ref.strip_prefix("data:image/")?;
    let (_, body) = raw.split_once(";base64,")?;
    Some(body.to_string())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.into())
}

/// Accepts JSON numbers and strings with thousands separators; anything else
/// is zero.
fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.replace(',', "").trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn lenient_timestamp(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|parsed| parsed.timestamp_millis()),
        _ => None,
    }
}

/// ISO date strings from the sheet become display dates; anything already in
/// display form passes through.
fn normalize_sheet_date(raw: Option<&str>) -> String {
    let value = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return String::new(),
    };
    if value.contains('T') || looks_like_iso_date(value) {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return thai_display_date(parsed.date_naive());
        }
        if looks_like_iso_date(value) {
            if let Ok(parsed) = NaiveDate::parse_from_str(&value[..10], "%Y-%m-%d") {
                return thai_display_date(parsed);
            }
        }
    }
    value.to_string()
}

/// ISO time strings become `HH:MM`; anything else passes through.
fn normalize_sheet_time(raw: Option<&str>) -> String {
    let value = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return String::new(),
    };
    if value.contains('T') {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return parsed.format("%H:%M").to_string();
        }
    }
    value.to_string()
}

fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Rewrites Google Drive links to the stable thumbnail endpoint, wraps bare
/// base64 bodies into data URLs, and passes plain URLs through.
fn normalize_image_ref(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.len() < 5 {
        return None;
    }
    if value.contains("drive.google.com") {
        if let Some(file_id) = longest_id_run(value) {
            return Some(format!(
                "https://drive.google.com/thumbnail?id={file_id}&sz=w1000"
            ));
        }
    }
    if value.starts_with("data:image") {
        return Some(value.to_string());
    }
    if value.starts_with("http") {
        return Some(value.to_string());
    }
    if value.len() > 100 {
        return Some(format!("data:image/jpeg;base64,{value}"));
    }
    None
}

/// Longest run of id-safe characters, accepted when 25+ chars (Drive file
/// ids).
fn longest_id_run(value: &str) -> Option<&str> {
    let mut best: Option<(usize, usize)> = None;
    let mut start: Option<usize> = None;
    for (idx, ch) in value.char_indices() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            start.get_or_insert(idx);
        } else if let Some(run_start) = start.take() {
            if best.map_or(true, |(b_start, b_end)| idx - run_start > b_end - b_start) {
                best = Some((run_start, idx));
            }
        }
    }
    if let Some(run_start) = start {
        let end = value.len();
        if best.map_or(true, |(b_start, b_end)| end - run_start > b_end - b_start) {
            best = Some((run_start, end));
        }
    }
    best.filter(|(run_start, end)| end - run_start >= 25)
        .map(|(run_start, end)| &value[run_start..end])
}
