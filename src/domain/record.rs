use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{self, PriceSchedule};

/// Placeholder for text fields the capture step could not read.
pub const MISSING_TEXT: &str = "-";

/// Default product label for a load when the slip names none.
pub const DEFAULT_PRODUCT: &str = "อ้อย";

/// One weighbridge event.
///
/// `timestamp` (epoch milliseconds) is authoritative for ordering and for
/// goal-window membership; `date`/`time` are the display strings printed on
/// the slip and are only parsed for grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeighRecord {
    pub id: String,
    pub ticket_number: String,
    pub date: String,
    pub time: String,
    pub net_weight_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tare_weight_kg: Option<f64>,
    pub license_plate: String,
    pub vendor_name: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub timestamp: i64,
    /// Goal snapshot taken at creation time; never recomputed when the
    /// active goal later changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    /// Derived from moisture via the price schedule, never entered directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cane_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
}

impl WeighRecord {
    pub fn new(
        ticket_number: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        net_weight_kg: f64,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_number: ticket_number.into(),
            date: date.into(),
            time: time.into(),
            net_weight_kg,
            gross_weight_kg: None,
            tare_weight_kg: None,
            license_plate: MISSING_TEXT.into(),
            vendor_name: MISSING_TEXT.into(),
            product_name: DEFAULT_PRODUCT.into(),
            image_ref: None,
            timestamp,
            goal_target: None,
            goal_round: None,
            moisture: None,
            cane_price: None,
            total_value: None,
        }
    }

    pub fn net_weight_tons(&self) -> f64 {
        self.net_weight_kg / 1000.0
    }

    pub fn has_moisture(&self) -> bool {
        matches!(self.moisture, Some(value) if value > 0.0)
    }

    /// Records the user-supplied moisture reading and reprices the load.
    pub fn set_moisture(&mut self, moisture: f64, schedule: &PriceSchedule) {
        self.moisture = Some(moisture);
        self.reprice(schedule);
    }

    /// Corrects the net weight and keeps the derived value in step.
    pub fn set_net_weight(&mut self, net_weight_kg: f64, schedule: &PriceSchedule) {
        self.net_weight_kg = net_weight_kg;
        self.reprice(schedule);
    }

    /// Recomputes `cane_price` and `total_value` from the current moisture and
    /// weight. Invariant: `total_value == net tons × cane_price` whenever both
    /// are present; without a moisture reading neither is.
    pub fn reprice(&mut self, schedule: &PriceSchedule) {
        match self.moisture {
            Some(moisture) => {
                let price = schedule.price_for(moisture);
                self.cane_price = Some(price);
                self.total_value = Some(pricing::total_value(self.net_weight_kg, price));
            }
            None => {
                self.cane_price = None;
                self.total_value = None;
            }
        }
    }

    /// Stamps the goal active at creation time onto the record.
    pub fn attribute_goal(&mut self, target_tons: f64, round: u32) {
        self.goal_target = Some(target_tons);
        self.goal_round = Some(round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::STANDARD_SCHEDULE;

    fn sample() -> WeighRecord {
        WeighRecord::new("10234", "15/2/2568", "09:41", 15_000.0, 1_739_580_000_000)
    }

    #[test]
    fn new_records_carry_no_pricing() {
        let record = sample();
        assert!(record.moisture.is_none());
        assert!(record.cane_price.is_none());
        assert!(record.total_value.is_none());
        assert!(!record.has_moisture());
    }

    #[test]
    fn set_moisture_derives_price_and_value() {
        let mut record = sample();
        record.set_moisture(22.0, &STANDARD_SCHEDULE);
        assert_eq!(record.cane_price, Some(877.0));
        assert_eq!(record.total_value, Some(15.0 * 877.0));
    }

    #[test]
    fn weight_edits_keep_value_in_step() {
        let mut record = sample();
        record.set_moisture(20.0, &STANDARD_SCHEDULE);
        record.set_net_weight(20_000.0, &STANDARD_SCHEDULE);
        assert_eq!(record.total_value, Some(20.0 * 900.0));
    }

    #[test]
    fn value_never_drifts_from_price_times_tons() {
        let mut record = sample();
        for moisture in [20.0, 25.5, 41.0, 44.0] {
            record.set_moisture(moisture, &STANDARD_SCHEDULE);
            let price = record.cane_price.expect("price set");
            assert_eq!(record.total_value, Some(record.net_weight_tons() * price));
        }
    }

    #[test]
    fn goal_attribution_is_a_plain_snapshot() {
        let mut record = sample();
        record.attribute_goal(1000.0, 2);
        assert_eq!(record.goal_target, Some(1000.0));
        assert_eq!(record.goal_round, Some(2));
    }
}
