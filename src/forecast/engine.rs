use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calendar::DayKey;

use super::{ForecastOutcome, HistoricalStats, MultiplierPolicy, RateSource};

pub struct ForecastEngine;

impl ForecastEngine {
    /// Projects production from the day after `today` through `end_date`
    /// inclusive.
    ///
    /// Holidays contribute nothing, even when a rate adjustment names the same
    /// day. Every other day is a working day (Sundays included) and accrues
    /// the daily rate, shaped by a matching adjustment when one exists.
    /// Deterministic: identical inputs produce identical output.
    pub fn project(
        stats: &HistoricalStats,
        today: NaiveDate,
        end_date: NaiveDate,
        holidays: &HashSet<DayKey>,
        rate: &RateSource,
        policy: &MultiplierPolicy,
    ) -> ForecastOutcome {
        let base_rate = match rate {
            RateSource::HistoricalAverage => stats.avg_weight_per_day,
            RateSource::Override { tons_per_day, .. } => *tons_per_day,
        };

        let mut working_days = 0u32;
        let mut holiday_count = 0u32;
        let mut projected_extra_weight = 0.0f64;

        let mut cursor = today.succ_opt();
        while let Some(day) = cursor {
            if day > end_date {
                break;
            }
            let key = DayKey::of(day);
            if holidays.contains(&key) {
                holiday_count += 1;
            } else {
                working_days += 1;
                let mut daily = base_rate;
                if let RateSource::Override { adjustments, .. } = rate {
                    if let Some(adjustment) = adjustments.get(&key) {
                        daily = base_rate * adjustment.effective_multiplier(policy);
                    }
                }
                projected_extra_weight += daily;
            }
            cursor = day.succ_opt();
        }

        let projected_extra_income = projected_extra_weight * stats.avg_price_per_ton;
        ForecastOutcome {
            working_days,
            holiday_count,
            projected_extra_weight,
            projected_extra_income,
            final_weight: stats.total_weight_tons + projected_extra_weight,
            final_income: stats.total_income + projected_extra_income,
        }
    }
}
