//! Moisture-based cane pricing.
//!
//! The factory pays per ton according to the measured moisture of the load.
//! The schedule is a step function: ascending moisture thresholds with
//! non-increasing prices, and a cutoff above which the load is unsellable.

use once_cell::sync::Lazy;

/// Fallback price per ton used when no priced record exists yet.
pub const DEFAULT_PRICE_PER_TON: f64 = 900.0;

/// Moisture above this percentage prices at zero.
pub const MOISTURE_CUTOFF: f64 = 41.0;

/// One step of the schedule: applies to any moisture at or below `max_moisture`
/// not already claimed by an earlier step.
#[derive(Debug, Clone, Copy)]
pub struct PriceStep {
    pub max_moisture: f64,
    pub price_per_ton: f64,
}

/// The 2568-season factory schedule.
const STANDARD_STEPS: [(f64, f64); 22] = [
    (20.0, 900.0),
    (21.0, 889.0),
    (22.0, 877.0),
    (23.0, 865.0),
    (24.0, 853.0),
    (25.0, 840.0),
    (26.0, 827.0),
    (27.0, 814.0),
    (28.0, 800.0),
    (29.0, 786.0),
    (30.0, 771.0),
    (31.0, 756.0),
    (32.0, 740.0),
    (33.0, 724.0),
    (34.0, 707.0),
    (35.0, 690.0),
    (36.0, 672.0),
    (37.0, 654.0),
    (38.0, 635.0),
    (39.0, 617.0),
    (40.0, 598.0),
    (41.0, 580.0),
];

/// A moisture → price-per-ton step table.
#[derive(Debug, Clone)]
pub struct PriceSchedule {
    steps: Vec<PriceStep>,
}

/// Shared instance of the standard schedule.
pub static STANDARD_SCHEDULE: Lazy<PriceSchedule> = Lazy::new(PriceSchedule::default);

impl Default for PriceSchedule {
    fn default() -> Self {
        Self::from_steps(
            STANDARD_STEPS
                .iter()
                .map(|&(max_moisture, price_per_ton)| PriceStep {
                    max_moisture,
                    price_per_ton,
                })
                .collect(),
        )
    }
}

impl PriceSchedule {
    /// Builds a schedule from steps already sorted by ascending threshold.
    pub fn from_steps(steps: Vec<PriceStep>) -> Self {
        debug_assert!(
            steps
                .windows(2)
                .all(|pair| pair[0].max_moisture < pair[1].max_moisture),
            "schedule thresholds must ascend"
        );
        Self { steps }
    }

    /// Price per ton for the given moisture percentage.
    ///
    /// The lookup is total: any numeric input maps to a price. Readings at or
    /// below the first threshold (zero and negative included) take the top
    /// price; readings above the last threshold price at zero. Range
    /// validation happens at the input boundary, not here.
    pub fn price_for(&self, moisture: f64) -> f64 {
        for step in &self.steps {
            if moisture <= step.max_moisture {
                return step.price_per_ton;
            }
        }
        0.0
    }
}

/// Price per ton under the standard schedule.
pub fn price_for_moisture(moisture: f64) -> f64 {
    STANDARD_SCHEDULE.price_for(moisture)
}

/// Monetary value of a load: net weight in tons times price per ton.
pub fn total_value(net_weight_kg: f64, price_per_ton: f64) -> f64 {
    (net_weight_kg / 1000.0) * price_per_ton
}
