mod common;

use chrono::{TimeZone, Utc};
use serde_json::json;

use cane_core::capture::{self, TicketExtraction};
use cane_core::core::services::{RecordService, SummaryService};
use cane_core::domain::{QuotaSettings, RecordBook};
use cane_core::export;
use cane_core::pricing::STANDARD_SCHEDULE;
use cane_core::sync::{RemoteRow, RemoteSync, SyncChange, SyncError, SyncService};

struct OfflineRemote;

impl RemoteSync for OfflineRemote {
    fn push(&self, _change: SyncChange) -> Result<(), SyncError> {
        Err(SyncError::Transport("no connectivity".into()))
    }

    fn fetch(&self) -> Result<Vec<RemoteRow>, SyncError> {
        Err(SyncError::Transport("no connectivity".into()))
    }
}

struct SheetRemote(Vec<RemoteRow>);

impl RemoteSync for SheetRemote {
    fn push(&self, _change: SyncChange) -> Result<(), SyncError> {
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<RemoteRow>, SyncError> {
        Ok(self.0.clone())
    }
}

#[test]
fn capture_price_export_delete_runs_end_to_end() {
    let now = Utc.with_ymd_and_hms(2025, 2, 15, 9, 41, 0).unwrap();
    let mut book = RecordBook::new(now);
    let settings = QuotaSettings::default();

    // Capture produced a candidate with a couple of unreadable fields.
    let draft = capture::draft_record(
        TicketExtraction {
            ticket_number: Some("10234".into()),
            date: Some("15/2/2568".into()),
            time: Some("09:41".into()),
            net_weight_kg: Some(20_000.0),
            ..Default::default()
        },
        None,
        now,
    );
    let id = RecordService::add(&mut book, &settings, draft, now);

    // The weighing house phoned in the moisture reading later.
    RecordService::set_moisture(&mut book, &id, 22.0, &STANDARD_SCHEDULE, now).expect("moisture");

    // Offline sync is tolerated; the local book remains the truth.
    let stored = book.record(&id).expect("stored").clone();
    let pushed = SyncService::push(
        &OfflineRemote,
        SyncChange::Create(cane_core::sync::SyncPayload::from_record(&stored)),
    );
    assert!(!pushed);
    assert_eq!(book.record_count(), 1);

    let csv = export::export_string(&book.records).expect("export");
    assert!(csv.contains("10234"));
    assert!(csv.contains("17540"));

    let removed = RecordService::remove(&mut book, &id, now).expect("delete");
    assert_eq!(removed.id, id);
    assert_eq!(book.record_count(), 0);
}

#[test]
fn remote_refresh_replaces_and_regroups() {
    let now = Utc.with_ymd_and_hms(2025, 2, 20, 12, 0, 0).unwrap();
    let mut book = RecordBook::new(now);
    book.add_record(
        common::record("1/2/2568", 5_000.0, now.timestamp_millis()),
        now,
    );

    let rows: Vec<RemoteRow> = serde_json::from_value(json!([
        {
            "id": "a-1",
            "ticketNumber": "1",
            "date": "2025-02-15T00:00:00.000Z",
            "netWeightKg": "10,000",
            "moisture": 22,
            "canePrice": 877,
            "totalValue": 8770
        },
        {
            "ticketNumber": "2",
            "date": "15/2/2568",
            "netWeightKg": 6000
        },
        {
            "ticketNumber": "3",
            "date": "16/2/2568",
            "netWeightKg": 4000
        }
    ]))
    .expect("rows");

    let installed =
        SyncService::refresh(&mut book, &SheetRemote(rows), now).expect("refresh succeeds");
    assert_eq!(installed, 3);
    assert_eq!(book.record_count(), 3);

    // Both ISO and display dates for 15 February group together.
    let grouped = SummaryService::group_by_day(&book.records);
    let feb15 = grouped
        .get(&cane_core::calendar::bucket_for("15/2/2568"))
        .expect("15/2 bucket");
    assert_eq!(feb15.count, 2);
    assert_eq!(feb15.total_weight_tons, 16.0);
    assert_eq!(feb15.total_value, 8_770.0);
}
