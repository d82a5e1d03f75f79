use thiserror::Error;

/// Operational failures of the adaptation core.
///
/// Every variant is logged at its emission point before being returned;
/// none of them aborts the process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdaptError {
    #[error("accuracy must be 0 or 1, got {0}")]
    InvalidAccuracy(f64),

    #[error("response time must be positive, got {0} ms")]
    InvalidResponseTime(f64),

    #[error("scenario time limit must be positive, got {0} ms")]
    InvalidTimeLimit(f64),

    #[error("unknown player '{player_id}' in game '{game_id}'")]
    UnknownPlayer { game_id: String, player_id: String },

    #[error("unknown scenario '{scenario_id}' in game '{game_id}'")]
    UnknownScenario { game_id: String, scenario_id: String },

    #[error("no scenarios registered for game '{0}'")]
    NoScenarios(String),

    #[error("empty scenario id registered for game '{0}'")]
    EmptyScenarioId(String)
}
