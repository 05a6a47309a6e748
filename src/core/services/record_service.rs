//! Business logic helpers for managing weighbridge records.

use chrono::{DateTime, Utc};

use crate::domain::{QuotaSettings, RecordBook, WeighRecord};
use crate::pricing::PriceSchedule;

use super::{ServiceError, ServiceResult};

/// Validated CRUD helpers for the record book.
pub struct RecordService;

impl RecordService {
    /// Files a new record: stamps the goal active right now onto it, then
    /// appends. Returns the record's identifier.
    pub fn add(
        book: &mut RecordBook,
        settings: &QuotaSettings,
        mut record: WeighRecord,
        now: DateTime<Utc>,
    ) -> String {
        record.attribute_goal(settings.target_tons, settings.current_round());
        book.add_record(record, now)
    }

    /// Updates the record identified by `id` via the provided mutator, then
    /// reprices so the stored value cannot drift from weight × price.
    pub fn update<F>(
        book: &mut RecordBook,
        id: &str,
        schedule: &PriceSchedule,
        now: DateTime<Utc>,
        mutator: F,
    ) -> ServiceResult<()>
    where
        F: FnOnce(&mut WeighRecord),
    {
        let record = book
            .record_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("record {id} not found")))?;
        mutator(record);
        record.reprice(schedule);
        book.touch(now);
        Ok(())
    }

    /// Records the user-supplied moisture reading for one load.
    pub fn set_moisture(
        book: &mut RecordBook,
        id: &str,
        moisture: f64,
        schedule: &PriceSchedule,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        if !(0.0..=100.0).contains(&moisture) {
            return Err(ServiceError::Invalid(format!(
                "moisture must be a percentage, got {moisture}"
            )));
        }
        Self::update(book, id, schedule, now, |record| {
            record.moisture = Some(moisture);
        })
    }

    /// Removes the record identified by `id`, returning the removed instance.
    ///
    /// Local removal always succeeds when the id exists; whether the remote
    /// copy goes away too is the sync layer's problem.
    pub fn remove(
        book: &mut RecordBook,
        id: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<WeighRecord> {
        book.remove_record(id, now)
            .ok_or_else(|| ServiceError::Invalid(format!("record {id} not found")))
    }

    /// Snapshot of the book's records in chronological order.
    pub fn list_chronological(book: &RecordBook) -> Vec<&WeighRecord> {
        let mut records: Vec<&WeighRecord> = book.records.iter().collect();
        records.sort_by_key(|record| record.timestamp);
        records
    }
}
