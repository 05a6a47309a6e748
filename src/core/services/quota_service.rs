//! Goal-round tracking over the record set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::thai_display_date;
use crate::domain::{GoalHistory, QuotaSettings, WeighRecord};

use super::{ServiceError, ServiceResult};

/// Progress of the active round against its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub achieved_tons: f64,
    pub percentage: f64,
    pub remaining_tons: f64,
    pub achieved: bool,
}

pub struct QuotaService;

impl QuotaService {
    /// Records belonging to the round that started at `start_ms`.
    ///
    /// Pure filter on the authoritative timestamp; input ordering is kept.
    pub fn active_round_records(records: &[WeighRecord], start_ms: i64) -> Vec<&WeighRecord> {
        records
            .iter()
            .filter(|record| record.timestamp >= start_ms)
            .collect()
    }

    /// Progress of the given round records against a target.
    ///
    /// The percentage is clamped to `[0, 100]` no matter how far the round
    /// overshoots.
    pub fn progress(records: &[&WeighRecord], target_tons: f64) -> GoalProgress {
        let achieved_tons: f64 = records
            .iter()
            .map(|record| record.net_weight_tons())
            .sum();
        let percentage = (achieved_tons / target_tons * 100.0).clamp(0.0, 100.0);
        GoalProgress {
            achieved_tons,
            percentage,
            remaining_tons: (target_tons - achieved_tons).max(0.0),
            achieved: achieved_tons >= target_tons,
        }
    }

    /// Progress of the active round under the current settings.
    pub fn round_progress(records: &[WeighRecord], settings: &QuotaSettings) -> GoalProgress {
        let active = Self::active_round_records(records, settings.current_goal_start_ms);
        Self::progress(&active, settings.target_tons)
    }

    /// Closes the active round and opens the next one.
    ///
    /// Returns a new settings value: a history entry for the finished round is
    /// prepended (newest first), the target becomes `new_target`, and the
    /// round window restarts at `now`. The input is never mutated, and there
    /// is no undo; callers confirm with the user before invoking this.
    pub fn start_next_round(
        settings: &QuotaSettings,
        records: &[WeighRecord],
        new_target: f64,
        now: DateTime<Utc>,
    ) -> ServiceResult<QuotaSettings> {
        if new_target <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "new round target must be positive, got {new_target}"
            )));
        }

        let progress = Self::round_progress(records, settings);
        let now_ms = now.timestamp_millis();
        let completed = GoalHistory {
            round: settings.current_round(),
            target_tons: settings.target_tons,
            achieved_tons: progress.achieved_tons,
            completed_date: thai_display_date(now.date_naive()),
            timestamp: now_ms,
        };
        info!(
            round = completed.round,
            achieved_tons = completed.achieved_tons,
            "goal round closed"
        );

        let mut history = Vec::with_capacity(settings.history.len() + 1);
        history.push(completed);
        history.extend(settings.history.iter().cloned());

        Ok(QuotaSettings {
            target_tons: new_target,
            current_goal_start_ms: now_ms,
            history,
        })
    }

    /// Adjusts the active round's target without closing the round.
    pub fn update_target(
        settings: &QuotaSettings,
        new_target: f64,
    ) -> ServiceResult<QuotaSettings> {
        if new_target <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "target must be positive, got {new_target}"
            )));
        }
        let mut updated = settings.clone();
        updated.target_tons = new_target;
        Ok(updated)
    }
}
