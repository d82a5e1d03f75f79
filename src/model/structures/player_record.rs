use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Skill-rating state for one player within one game.
///
/// Owned by the ratings store; mutated only through the rating update rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    /// Skill rating theta. Unbounded real.
    pub rating: f64,
    pub play_count: u32,
    /// Confidence decay value in [0, 1]; 1 = maximally uncertain.
    pub uncertainty: f64,
    /// K-factor applied on the most recent update.
    pub k_factor: f64,
    pub last_played: DateTime<Utc>
}
