//! Grouping and reporting aggregates for the dashboard and charts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::{self, DateBucket, MonthBucket};
use crate::domain::WeighRecord;

/// Totals for one grouping bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub count: usize,
    pub total_weight_tons: f64,
    pub total_value: f64,
}

impl GroupTotals {
    fn absorb(&mut self, record: &WeighRecord) {
        self.count += 1;
        self.total_weight_tons += record.net_weight_tons();
        self.total_value += record.total_value.unwrap_or(0.0);
    }
}

/// One point of a running-total series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub label: String,
    pub cumulative_tons: f64,
    pub cumulative_value: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Groups records by calendar day of their display date.
    ///
    /// Input order is irrelevant; unparsable dates land in the fallback
    /// bucket, which sorts first.
    pub fn group_by_day(records: &[WeighRecord]) -> BTreeMap<DateBucket, GroupTotals> {
        let mut grouped: BTreeMap<DateBucket, GroupTotals> = BTreeMap::new();
        for record in records {
            grouped
                .entry(calendar::bucket_for(&record.date))
                .or_default()
                .absorb(record);
        }
        grouped
    }

    /// Groups records by the month of their display date.
    pub fn group_by_month(records: &[WeighRecord]) -> BTreeMap<MonthBucket, GroupTotals> {
        let mut grouped: BTreeMap<MonthBucket, GroupTotals> = BTreeMap::new();
        for record in records {
            grouped
                .entry(calendar::month_bucket_for(&record.date))
                .or_default()
                .absorb(record);
        }
        grouped
    }

    /// Running totals over day buckets in chronological order.
    ///
    /// The weight dimension never decreases: weights are non-negative.
    pub fn cumulative_series(daily: &BTreeMap<DateBucket, GroupTotals>) -> Vec<CumulativePoint> {
        let mut cumulative_tons = 0.0;
        let mut cumulative_value = 0.0;
        daily
            .iter()
            .map(|(bucket, totals)| {
                cumulative_tons += totals.total_weight_tons;
                cumulative_value += totals.total_value;
                CumulativePoint {
                    label: bucket.to_string(),
                    cumulative_tons,
                    cumulative_value,
                }
            })
            .collect()
    }

    /// Total tonnage hauled across all rounds.
    pub fn lifetime_weight_tons(records: &[WeighRecord]) -> f64 {
        records.iter().map(WeighRecord::net_weight_tons).sum()
    }

    /// Number of trips whose slip shows the given display date.
    pub fn trips_on(records: &[WeighRecord], date_label: &str) -> usize {
        records
            .iter()
            .filter(|record| record.date == date_label)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::STANDARD_SCHEDULE;

    fn record(date: &str, net_kg: f64, ts: i64) -> WeighRecord {
        WeighRecord::new("t", date, "08:00", net_kg, ts)
    }

    fn priced(date: &str, net_kg: f64, moisture: f64, ts: i64) -> WeighRecord {
        let mut record = record(date, net_kg, ts);
        record.set_moisture(moisture, &STANDARD_SCHEDULE);
        record
    }

    #[test]
    fn day_groups_accumulate_count_weight_and_value() {
        let records = vec![
            priced("15/2/2568", 10_000.0, 20.0, 1),
            priced("15/2/2568", 5_000.0, 20.0, 2),
            record("16/2/2568", 8_000.0, 3),
        ];
        let grouped = SummaryService::group_by_day(&records);
        assert_eq!(grouped.len(), 2);
        let day = grouped
            .get(&calendar::bucket_for("15/2/2568"))
            .expect("day bucket");
        assert_eq!(day.count, 2);
        assert_eq!(day.total_weight_tons, 15.0);
        assert_eq!(day.total_value, 15.0 * 900.0);
    }

    #[test]
    fn grouping_is_input_order_insensitive() {
        let mut records = vec![
            record("15/2/2568", 10_000.0, 1),
            record("16/2/2568", 8_000.0, 2),
            record("15/2/2568", 5_000.0, 3),
        ];
        let forward = SummaryService::group_by_day(&records);
        records.reverse();
        let backward = SummaryService::group_by_day(&records);
        assert_eq!(forward, backward);
    }

    #[test]
    fn bad_dates_group_under_the_fallback_bucket() {
        let records = vec![record("??", 1_000.0, 1), record("", 2_000.0, 2)];
        let grouped = SummaryService::group_by_day(&records);
        assert_eq!(grouped.len(), 1);
        let bucket = grouped.get(&DateBucket::Unspecified).expect("fallback");
        assert_eq!(bucket.count, 2);
    }

    #[test]
    fn month_groups_follow_parsed_display_dates() {
        let records = vec![
            record("15/2/2568", 10_000.0, 1),
            record("1/3/2568", 5_000.0, 2),
            record("12 มีนาคม 2568", 6_000.0, 3),
        ];
        let grouped = SummaryService::group_by_month(&records);
        assert_eq!(grouped.len(), 2);
        let march = grouped
            .get(&MonthBucket::Month {
                year: 2025,
                month: 3,
            })
            .expect("march bucket");
        assert_eq!(march.count, 2);
        assert_eq!(march.total_weight_tons, 11.0);
    }

    #[test]
    fn cumulative_series_never_decreases() {
        let records = vec![
            record("15/2/2568", 10_000.0, 1),
            record("16/2/2568", 0.0, 2),
            record("17/2/2568", 4_000.0, 3),
        ];
        let series = SummaryService::cumulative_series(&SummaryService::group_by_day(&records));
        assert_eq!(series.len(), 3);
        for pair in series.windows(2) {
            assert!(pair[1].cumulative_tons >= pair[0].cumulative_tons);
        }
        assert_eq!(series.last().unwrap().cumulative_tons, 14.0);
    }

    #[test]
    fn trips_on_counts_exact_display_dates() {
        let records = vec![
            record("15/2/2568", 10_000.0, 1),
            record("15/2/2568", 5_000.0, 2),
            record("16/2/2568", 8_000.0, 3),
        ];
        assert_eq!(SummaryService::trips_on(&records, "15/2/2568"), 2);
        assert_eq!(SummaryService::trips_on(&records, "1/1/2568"), 0);
        assert_eq!(SummaryService::lifetime_weight_tons(&records), 23.0);
    }
}
