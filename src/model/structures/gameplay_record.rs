use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only history entry, created exactly once per successful
/// rating update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayRecord {
    /// Sequential id assigned by the log.
    pub id: u64,
    pub adaptation: String,
    pub game_id: String,
    pub player_id: String,
    pub scenario_id: String,
    pub timestamp: DateTime<Utc>,
    pub response_time_ms: f64,
    /// 0.0 or 1.0.
    pub accuracy: f64,
    pub player_rating: f64,
    pub scenario_rating: f64,
    /// Whether the caller requested a durable save alongside this update.
    pub persisted: bool
}
