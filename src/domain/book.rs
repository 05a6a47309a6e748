use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::WeighRecord;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The stored collection of weighbridge records.
///
/// Append-only from the app's point of view; removal is an explicit user
/// action. Ordering of the backing vector is insertion order; consumers sort
/// by `timestamp` where chronology matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordBook {
    #[serde(default)]
    pub records: Vec<WeighRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "RecordBook::schema_version_default")]
    pub schema_version: u8,
}

impl RecordBook {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            records: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_record(&mut self, record: WeighRecord, now: DateTime<Utc>) -> String {
        let id = record.id.clone();
        self.records.push(record);
        self.touch(now);
        id
    }

    pub fn record(&self, id: &str) -> Option<&WeighRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn record_mut(&mut self, id: &str) -> Option<&mut WeighRecord> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    pub fn remove_record(&mut self, id: &str, now: DateTime<Utc>) -> Option<WeighRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        let removed = self.records.remove(index);
        self.touch(now);
        Some(removed)
    }

    /// Swaps in a freshly fetched record set, replacing local contents.
    pub fn replace_all(&mut self, records: Vec<WeighRecord>, now: DateTime<Utc>) {
        self.records = records;
        self.touch(now);
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
