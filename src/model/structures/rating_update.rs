use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one rating update, returned to the caller for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub actual_score: f64,
    pub expected_score: f64,
    pub player_rating_before: f64,
    pub player_rating_after: f64,
    pub player_k_factor: f64,
    pub scenario_rating_before: f64,
    pub scenario_rating_after: f64,
    pub scenario_k_factor: f64,
    pub timestamp: DateTime<Utc>
}
