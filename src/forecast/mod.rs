//! Season-end production forecasting.
//!
//! Pure calendar arithmetic over a snapshot of inputs: historical per-day
//! rates derived from the record set, a fixed season end date, the holiday
//! table, and optional per-day rate adjustments from the lucky-day calendar.

pub mod engine;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::calendar::DayKey;
use crate::domain::WeighRecord;
use crate::pricing::DEFAULT_PRICE_PER_TON;

pub use engine::ForecastEngine;

/// Whether a calendar day is expected to help or hurt output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOutlook {
    Good,
    Bad,
}

/// Per-day rate adjustment. An explicit multiplier wins over the policy
/// default for the day's outlook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayAdjustment {
    pub outlook: DayOutlook,
    pub multiplier: Option<f64>,
}

impl DayAdjustment {
    pub fn effective_multiplier(&self, policy: &MultiplierPolicy) -> f64 {
        self.multiplier.unwrap_or(match self.outlook {
            DayOutlook::Good => policy.good,
            DayOutlook::Bad => policy.bad,
        })
    }
}

/// Default multipliers applied to good/bad days with no explicit value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierPolicy {
    pub good: f64,
    pub bad: f64,
}

impl Default for MultiplierPolicy {
    fn default() -> Self {
        Self {
            good: 1.2,
            bad: 0.5,
        }
    }
}

/// Where the projected daily tonnage comes from.
#[derive(Debug, Clone)]
pub enum RateSource {
    /// Use the historical average achieved-tons-per-worked-day.
    HistoricalAverage,
    /// Externally supplied rate, optionally shaped by per-day adjustments.
    Override {
        tons_per_day: f64,
        adjustments: HashMap<DayKey, DayAdjustment>,
    },
}

/// Projection result for the remaining season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub working_days: u32,
    pub holiday_count: u32,
    pub projected_extra_weight: f64,
    pub projected_extra_income: f64,
    pub final_weight: f64,
    pub final_income: f64,
}

/// Aggregates derived from the historical record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalStats {
    pub total_weight_tons: f64,
    pub total_income: f64,
    pub days_worked: usize,
    pub avg_weight_per_day: f64,
    pub avg_price_per_ton: f64,
}

impl HistoricalStats {
    /// Derives the historical baseline, or `None` for an empty record set.
    ///
    /// The forecast must not run without history; callers short-circuit on
    /// `None` and show their empty state instead.
    pub fn from_records(records: &[WeighRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let total_weight_tons: f64 = records.iter().map(WeighRecord::net_weight_tons).sum();
        let total_income: f64 = records
            .iter()
            .filter_map(|record| record.total_value)
            .sum();

        // Distinct calendar days with at least one delivery; multiple trips on
        // the same day count once for the denominator.
        let days_worked = records
            .iter()
            .map(|record| record.date.as_str())
            .collect::<HashSet<_>>()
            .len()
            .max(1);

        let priced: Vec<f64> = records
            .iter()
            .filter_map(|record| record.cane_price)
            .filter(|price| *price > 0.0)
            .collect();
        let avg_price_per_ton = if priced.is_empty() {
            DEFAULT_PRICE_PER_TON
        } else {
            priced.iter().sum::<f64>() / priced.len() as f64
        };

        Some(Self {
            total_weight_tons,
            total_income,
            days_worked,
            avg_weight_per_day: total_weight_tons / days_worked as f64,
            avg_price_per_ton,
        })
    }
}
