//! Glue between the record set, the reference tables, and the forecast engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::thai_day_month_label;
use crate::domain::WeighRecord;
use crate::forecast::{
    ForecastEngine, ForecastOutcome, HistoricalStats, MultiplierPolicy, RateSource,
};
use crate::reference;

use super::SummaryService;

/// A full season projection: the derived baseline plus the engine outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonOutlook {
    pub stats: HistoricalStats,
    pub outcome: ForecastOutcome,
}

/// One point of the actual-versus-forecast trend chart.
///
/// History points carry both values so the two lines connect; forecast
/// checkpoints carry only the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub actual: Option<f64>,
    pub projected: f64,
}

pub struct ForecastService;

impl ForecastService {
    /// Season projection from the historical average rate.
    ///
    /// Returns `None` for an empty record set: the forecast has nothing to
    /// extrapolate from, and the caller shows its empty state instead.
    pub fn project(
        records: &[WeighRecord],
        today: NaiveDate,
        end_date: NaiveDate,
    ) -> Option<SeasonOutlook> {
        let stats = HistoricalStats::from_records(records)?;
        let outcome = ForecastEngine::project(
            &stats,
            today,
            end_date,
            &reference::holiday_set(),
            &RateSource::HistoricalAverage,
            &MultiplierPolicy::default(),
        );
        Some(SeasonOutlook { stats, outcome })
    }

    /// Season projection with the lucky-day table shaping daily rates.
    ///
    /// `tons_per_day` overrides the base rate; when absent the historical
    /// average is used as the base under the adjusted calendar.
    pub fn project_with_lucky_days(
        records: &[WeighRecord],
        today: NaiveDate,
        end_date: NaiveDate,
        tons_per_day: Option<f64>,
        policy: MultiplierPolicy,
    ) -> Option<SeasonOutlook> {
        let stats = HistoricalStats::from_records(records)?;
        let rate = RateSource::Override {
            tons_per_day: tons_per_day.unwrap_or(stats.avg_weight_per_day),
            adjustments: reference::rate_adjustments(),
        };
        let outcome = ForecastEngine::project(
            &stats,
            today,
            end_date,
            &reference::holiday_set(),
            &rate,
            &policy,
        );
        Some(SeasonOutlook { stats, outcome })
    }

    /// Chart-ready series: cumulative history followed by a few linearized
    /// forecast checkpoints (next week, next month, season end).
    ///
    /// Checkpoints spread the projected extra weight by elapsed days times the
    /// working-day ratio, which is close enough for a trend line without
    /// replaying the full calendar walk per point.
    pub fn trend_series(
        records: &[WeighRecord],
        today: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<TrendPoint> {
        let outlook = match Self::project(records, today, end_date) {
            Some(outlook) => outlook,
            None => return Vec::new(),
        };

        let daily = SummaryService::group_by_day(records);
        let mut points: Vec<TrendPoint> = SummaryService::cumulative_series(&daily)
            .into_iter()
            .map(|point| TrendPoint {
                label: point.label,
                actual: Some(point.cumulative_tons),
                projected: point.cumulative_tons,
            })
            .collect();

        let history_total = points.last().map(|p| p.projected).unwrap_or(0.0);
        let span = outlook.outcome.working_days + outlook.outcome.holiday_count;
        let work_ratio = if span == 0 {
            0.0
        } else {
            f64::from(outlook.outcome.working_days) / f64::from(span)
        };

        let mut last_checkpoint: Option<NaiveDate> = None;
        let candidates = [
            today + chrono::Duration::days(7),
            today + chrono::Duration::days(30),
            end_date,
        ];
        for candidate in candidates {
            let checkpoint = candidate.min(end_date);
            if checkpoint <= today || last_checkpoint == Some(checkpoint) {
                continue;
            }
            last_checkpoint = Some(checkpoint);
            let elapsed = (checkpoint - today).num_days() as f64;
            let added = outlook.stats.avg_weight_per_day * elapsed * work_ratio;
            points.push(TrendPoint {
                label: thai_day_month_label(checkpoint),
                actual: None,
                projected: history_total + added,
            });
        }

        points
    }
}
