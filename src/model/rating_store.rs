use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::model::{
    constants::{DEFAULT_LAST_PLAYED, DEFAULT_RATING, DEFAULT_UNCERTAINTY},
    error::AdaptError,
    scoring::validate_time_limit,
    structures::{player_record::PlayerRecord, scenario_record::ScenarioRecord}
};

/// Last-played timestamp assigned to a freshly registered entity.
pub fn provisional_last_played() -> DateTime<Utc> {
    DEFAULT_LAST_PLAYED
        .parse()
        .expect("default last-played literal is valid RFC 3339")
}

/// The ratings-store collaborator contract, keyed by
/// (adaptation kind, game id, entity id).
///
/// The core never auto-creates records on the update path: a lookup of an
/// unknown id is an error the caller converts to an abort-with-log.
/// Registration is the only way records come into existence.
pub trait AdaptationStore {
    fn player(&self, adaptation: &str, game_id: &str, player_id: &str) -> Result<&PlayerRecord, AdaptError>;

    fn player_mut(&mut self, adaptation: &str, game_id: &str, player_id: &str)
        -> Result<&mut PlayerRecord, AdaptError>;

    fn scenario(&self, adaptation: &str, game_id: &str, scenario_id: &str) -> Result<&ScenarioRecord, AdaptError>;

    fn scenario_mut(
        &mut self,
        adaptation: &str,
        game_id: &str,
        scenario_id: &str
    ) -> Result<&mut ScenarioRecord, AdaptError>;

    /// All scenario ids known for a game, in registration order.
    fn scenario_ids(&self, adaptation: &str, game_id: &str) -> Vec<String>;

    /// Creates a player with the provisional rating, full uncertainty and
    /// the epoch last-played timestamp. Re-registering an existing player
    /// keeps the accumulated record.
    fn register_player(&mut self, adaptation: &str, game_id: &str, player_id: &str);

    /// Creates a scenario with the provisional defaults and a fixed,
    /// validated time limit.
    fn register_scenario(
        &mut self,
        adaptation: &str,
        game_id: &str,
        scenario_id: &str,
        time_limit_ms: f64
    ) -> Result<(), AdaptError>;

    /// Durable-save hook, invoked when an update requests persistence.
    fn save(&mut self);
}

type EntityKey = (String, String, String);

/// In-memory [`AdaptationStore`]. Insertion order is preserved so
/// [`AdaptationStore::scenario_ids`] enumerates deterministically.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    players: IndexMap<EntityKey, PlayerRecord>,
    scenarios: IndexMap<EntityKey, ScenarioRecord>
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn key(adaptation: &str, game_id: &str, entity_id: &str) -> EntityKey {
        (adaptation.to_string(), game_id.to_string(), entity_id.to_string())
    }
}

impl AdaptationStore for MemoryStore {
    fn player(&self, adaptation: &str, game_id: &str, player_id: &str) -> Result<&PlayerRecord, AdaptError> {
        self.players
            .get(&MemoryStore::key(adaptation, game_id, player_id))
            .ok_or_else(|| AdaptError::UnknownPlayer {
                game_id: game_id.to_string(),
                player_id: player_id.to_string()
            })
    }

    fn player_mut(
        &mut self,
        adaptation: &str,
        game_id: &str,
        player_id: &str
    ) -> Result<&mut PlayerRecord, AdaptError> {
        self.players
            .get_mut(&MemoryStore::key(adaptation, game_id, player_id))
            .ok_or_else(|| AdaptError::UnknownPlayer {
                game_id: game_id.to_string(),
                player_id: player_id.to_string()
            })
    }

    fn scenario(&self, adaptation: &str, game_id: &str, scenario_id: &str) -> Result<&ScenarioRecord, AdaptError> {
        self.scenarios
            .get(&MemoryStore::key(adaptation, game_id, scenario_id))
            .ok_or_else(|| AdaptError::UnknownScenario {
                game_id: game_id.to_string(),
                scenario_id: scenario_id.to_string()
            })
    }

    fn scenario_mut(
        &mut self,
        adaptation: &str,
        game_id: &str,
        scenario_id: &str
    ) -> Result<&mut ScenarioRecord, AdaptError> {
        self.scenarios
            .get_mut(&MemoryStore::key(adaptation, game_id, scenario_id))
            .ok_or_else(|| AdaptError::UnknownScenario {
                game_id: game_id.to_string(),
                scenario_id: scenario_id.to_string()
            })
    }

    fn scenario_ids(&self, adaptation: &str, game_id: &str) -> Vec<String> {
        self.scenarios
            .iter()
            .filter(|((kind, game, _), _)| kind == adaptation && game == game_id)
            .map(|((_, _, id), _)| id.clone())
            .collect()
    }

    fn register_player(&mut self, adaptation: &str, game_id: &str, player_id: &str) {
        let key = MemoryStore::key(adaptation, game_id, player_id);
        if self.players.contains_key(&key) {
            warn!(game_id, player_id, "player already registered, keeping the existing record");
            return;
        }

        self.players.insert(
            key,
            PlayerRecord {
                player_id: player_id.to_string(),
                rating: DEFAULT_RATING,
                play_count: 0,
                uncertainty: DEFAULT_UNCERTAINTY,
                k_factor: 0.0,
                last_played: provisional_last_played()
            }
        );
    }

    fn register_scenario(
        &mut self,
        adaptation: &str,
        game_id: &str,
        scenario_id: &str,
        time_limit_ms: f64
    ) -> Result<(), AdaptError> {
        validate_time_limit(time_limit_ms)?;

        let key = MemoryStore::key(adaptation, game_id, scenario_id);
        if self.scenarios.contains_key(&key) {
            warn!(game_id, scenario_id, "scenario already registered, keeping the existing record");
            return Ok(());
        }

        self.scenarios.insert(
            key,
            ScenarioRecord {
                scenario_id: scenario_id.to_string(),
                rating: DEFAULT_RATING,
                play_count: 0,
                uncertainty: DEFAULT_UNCERTAINTY,
                k_factor: 0.0,
                last_played: provisional_last_played(),
                time_limit_ms
            }
        );

        Ok(())
    }

    fn save(&mut self) {
        // Durable formats are owned by the embedding application
        debug!(
            players = self.players.len(),
            scenarios = self.scenarios.len(),
            "save requested on in-memory store"
        );
    }
}
