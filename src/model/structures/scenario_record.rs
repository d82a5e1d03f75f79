use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty-rating state for one scenario within one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub scenario_id: String,
    /// Difficulty rating beta. Unbounded real.
    pub rating: f64,
    pub play_count: u32,
    /// Confidence decay value in [0, 1]; 1 = maximally uncertain.
    pub uncertainty: f64,
    /// K-factor applied on the most recent update.
    pub k_factor: f64,
    pub last_played: DateTime<Utc>,
    /// Maximum response duration in milliseconds. Fixed at registration.
    pub time_limit_ms: f64
}
