use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

use cane_core::core::services::{ForecastService, SummaryService};
use cane_core::domain::{QuotaSettings, RecordBook, WeighRecord};
use cane_core::pricing::STANDARD_SCHEDULE;
use cane_core::storage::{JsonStorage, StorageBackend};

fn build_sample_book(record_count: usize) -> RecordBook {
    let start = Utc.with_ymd_and_hms(2024, 11, 1, 6, 0, 0).unwrap();
    let mut book = RecordBook::new(start);
    let settings = QuotaSettings::default();

    for idx in 0..record_count {
        let day_offset = (idx % 150) as i64;
        let date = start.date_naive() + chrono::Duration::days(day_offset);
        let display = cane_core::calendar::thai_display_date(date);
        let timestamp = start.timestamp_millis() + day_offset * 86_400_000 + (idx as i64 % 7) * 3_600_000;
        let mut record = WeighRecord::new(
            format!("{:05}", idx),
            display,
            "09:41",
            8_000.0 + (idx % 30) as f64 * 500.0,
            timestamp,
        );
        record.attribute_goal(settings.target_tons, 1);
        if idx % 3 == 0 {
            record.set_moisture(20.0 + (idx % 20) as f64, &STANDARD_SCHEDULE);
        }
        book.add_record(record, start);
    }
    book
}

fn bench_book_io(c: &mut Criterion) {
    let book = build_sample_book(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let storage = JsonStorage::new(Some(dir.path().to_path_buf()), Some(1)).expect("storage");

    c.bench_function("book_save_10k", |b| {
        b.iter(|| {
            storage.save_book(&book).expect("save book");
        })
    });

    storage.save_book(&book).expect("seed");

    c.bench_function("book_load_10k", |b| {
        b.iter(|| {
            let loaded = storage.load_book().expect("load book");
            black_box(loaded);
        })
    });
}

fn bench_aggregates(c: &mut Criterion) {
    let book = build_sample_book(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();
    let end_date = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();

    c.bench_function("group_by_day_10k", |b| {
        b.iter(|| {
            let grouped = SummaryService::group_by_day(&book.records);
            black_box(grouped);
        })
    });

    c.bench_function("season_forecast_10k", |b| {
        b.iter(|| {
            let outlook = ForecastService::project(&book.records, today, end_date);
            black_box(outlook);
        })
    });
}

criterion_group!(benches, bench_book_io, bench_aggregates);
criterion_main!(benches);
