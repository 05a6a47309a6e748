//! Slip capture intake.
//!
//! A vision collaborator reads the photographed weighbridge slip into
//! candidate fields; this module coerces whatever arrives into a complete
//! record. Low-confidence extractions come back with fields missing; those
//! become zeros and placeholders, never errors. The image itself is not
//! validated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::thai_display_date;
use crate::domain::record::{DEFAULT_PRODUCT, MISSING_TEXT};
use crate::domain::WeighRecord;
use crate::errors::CoreError;

/// Product label used for the blank form after a failed recognition.
const FALLBACK_PRODUCT: &str = "อ้อยสด";

/// Candidate fields extracted from a slip photo. Everything is optional;
/// absence means the reader could not find the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketExtraction {
    pub ticket_number: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub net_weight_kg: Option<f64>,
    pub gross_weight_kg: Option<f64>,
    pub tare_weight_kg: Option<f64>,
    pub license_plate: Option<String>,
    pub vendor_name: Option<String>,
    pub product_name: Option<String>,
}

/// Vision collaborator that reads a slip image into candidate fields.
pub trait TicketRecognizer {
    fn analyze(&self, image_base64: &str) -> Result<TicketExtraction, CoreError>;
}

/// Builds a record from an extraction, coercing missing fields.
pub fn draft_record(
    extraction: TicketExtraction,
    image_ref: Option<String>,
    now: DateTime<Utc>,
) -> WeighRecord {
    let mut record = WeighRecord::new(
        non_empty_or(extraction.ticket_number, MISSING_TEXT),
        extraction.date.unwrap_or_default(),
        extraction.time.unwrap_or_default(),
        extraction.net_weight_kg.unwrap_or(0.0),
        now.timestamp_millis(),
    );
    record.gross_weight_kg = extraction.gross_weight_kg.filter(|kg| *kg > 0.0);
    record.tare_weight_kg = extraction.tare_weight_kg.filter(|kg| *kg > 0.0);
    record.license_plate = non_empty_or(extraction.license_plate, MISSING_TEXT);
    record.vendor_name = non_empty_or(extraction.vendor_name, MISSING_TEXT);
    record.product_name = non_empty_or(extraction.product_name, DEFAULT_PRODUCT);
    record.image_ref = image_ref;
    record
}

/// Blank form for manual entry after a failed recognition, dated today.
pub fn empty_draft(image_ref: Option<String>, now: DateTime<Utc>) -> WeighRecord {
    let mut record = WeighRecord::new(
        "",
        thai_display_date(now.date_naive()),
        now.format("%H:%M").to_string(),
        0.0,
        now.timestamp_millis(),
    );
    record.license_plate = String::new();
    record.vendor_name = String::new();
    record.product_name = FALLBACK_PRODUCT.into();
    record.image_ref = image_ref;
    record
}

/// Runs the recognizer over a slip image and returns a draft record.
///
/// Recognition failure degrades to the blank form; capture never fails the
/// workflow outright.
pub fn capture(
    recognizer: &dyn TicketRecognizer,
    image_base64: &str,
    now: DateTime<Utc>,
) -> WeighRecord {
    match recognizer.analyze(image_base64) {
        Ok(extraction) => draft_record(extraction, Some(image_base64.to_string()), now),
        Err(err) => {
            warn!("slip recognition failed, falling back to manual entry: {err}");
            empty_draft(Some(image_base64.to_string()), now)
        }
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedRecognizer(Result<TicketExtraction, ()>);

    impl TicketRecognizer for FixedRecognizer {
        fn analyze(&self, _image_base64: &str) -> Result<TicketExtraction, CoreError> {
            self.0
                .clone()
                .map_err(|_| CoreError::CaptureError("no response from model".into()))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 15, 9, 41, 0).unwrap()
    }

    #[test]
    fn extraction_fields_flow_into_the_draft() {
        let extraction = TicketExtraction {
            ticket_number: Some("10234".into()),
            date: Some("15/2/2568".into()),
            time: Some("09:41".into()),
            net_weight_kg: Some(15_000.0),
            gross_weight_kg: Some(25_000.0),
            tare_weight_kg: Some(10_000.0),
            license_plate: Some("82-1234 ขก".into()),
            vendor_name: Some("สมชาย".into()),
            product_name: None,
        };
        let record = draft_record(extraction, Some("img".into()), now());
        assert_eq!(record.ticket_number, "10234");
        assert_eq!(record.net_weight_kg, 15_000.0);
        assert_eq!(record.gross_weight_kg, Some(25_000.0));
        assert_eq!(record.product_name, DEFAULT_PRODUCT);
        assert_eq!(record.image_ref.as_deref(), Some("img"));
        assert!(record.moisture.is_none());
    }

    #[test]
    fn low_confidence_extractions_coerce_to_placeholders() {
        let record = draft_record(TicketExtraction::default(), None, now());
        assert_eq!(record.ticket_number, MISSING_TEXT);
        assert_eq!(record.net_weight_kg, 0.0);
        assert_eq!(record.date, "");
        assert!(record.gross_weight_kg.is_none());
        assert_eq!(record.license_plate, MISSING_TEXT);
    }

    #[test]
    fn recognizer_output_becomes_a_record() {
        let recognizer = FixedRecognizer(Ok(TicketExtraction {
            ticket_number: Some("7".into()),
            net_weight_kg: Some(12_000.0),
            ..Default::default()
        }));
        let record = capture(&recognizer, "base64-image", now());
        assert_eq!(record.ticket_number, "7");
        assert_eq!(record.timestamp, now().timestamp_millis());
    }

    #[test]
    fn recognition_failure_degrades_to_a_dated_blank_form() {
        let recognizer = FixedRecognizer(Err(()));
        let record = capture(&recognizer, "base64-image", now());
        assert_eq!(record.net_weight_kg, 0.0);
        assert_eq!(record.date, "15/2/2568");
        assert_eq!(record.time, "09:41");
        assert_eq!(record.product_name, FALLBACK_PRODUCT);
        assert_eq!(record.image_ref.as_deref(), Some("base64-image"));
    }
}
