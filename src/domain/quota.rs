use serde::{Deserialize, Serialize};

/// Target applied on first run and offered as the suggestion for new rounds.
pub const DEFAULT_TARGET_TONS: f64 = 1000.0;

/// Immutable snapshot of one completed goal round.
///
/// Created exactly once when the round closes; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalHistory {
    pub round: u32,
    pub target_tons: f64,
    pub achieved_tons: f64,
    pub completed_date: String,
    pub timestamp: i64,
}

/// Process-wide goal state, one per user.
///
/// `history` is append-only, newest first; `current_goal_start_ms` only moves
/// forward. Records with `timestamp < current_goal_start_ms` are outside the
/// active round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaSettings {
    pub target_tons: f64,
    pub current_goal_start_ms: i64,
    #[serde(default)]
    pub history: Vec<GoalHistory>,
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            target_tons: DEFAULT_TARGET_TONS,
            current_goal_start_ms: 0,
            history: Vec::new(),
        }
    }
}

impl QuotaSettings {
    /// Round numbers are monotonic and never reused.
    pub fn current_round(&self) -> u32 {
        self.history.len() as u32 + 1
    }

    /// Builds a complete, defaulted value from whatever shape was on disk.
    ///
    /// Old installs persisted partial objects; rather than relying on merge
    /// semantics at the call sites, every load funnels through this one
    /// migration.
    pub fn from_partial(partial: PartialQuotaSettings) -> Self {
        let target_tons = partial
            .target_tons
            .filter(|target| *target > 0.0)
            .unwrap_or(DEFAULT_TARGET_TONS);
        Self {
            target_tons,
            current_goal_start_ms: partial.current_goal_start_ms.unwrap_or(0),
            history: partial.history.unwrap_or_default(),
        }
    }
}

/// On-disk shape tolerated on load: every field optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PartialQuotaSettings {
    #[serde(default)]
    pub target_tons: Option<f64>,
    #[serde(default)]
    pub current_goal_start_ms: Option<i64>,
    #[serde(default)]
    pub history: Option<Vec<GoalHistory>>,
}
