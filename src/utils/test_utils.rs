use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::model::{
    adapter_model::AdapterModel,
    constants::ADAPTATION_KIND,
    rating_store::{AdaptationStore, MemoryStore}
};

/// An engine over the in-memory store with a deterministic random source.
pub fn seeded_engine(seed: u64) -> AdapterModel<MemoryStore, ChaCha8Rng> {
    AdapterModel::with_rng(ChaCha8Rng::seed_from_u64(seed))
}

/// Registers one player plus a scenario bank with the given difficulty
/// ratings (ids `s0`, `s1`, ... in order) under a shared time limit.
pub fn populate_game(
    engine: &mut AdapterModel<MemoryStore, ChaCha8Rng>,
    game_id: &str,
    player_id: &str,
    scenario_ratings: &[f64],
    time_limit_ms: f64
) {
    engine.store.register_player(ADAPTATION_KIND, game_id, player_id);

    for (index, rating) in scenario_ratings.iter().enumerate() {
        let scenario_id = format!("s{index}");
        engine
            .store
            .register_scenario(ADAPTATION_KIND, game_id, &scenario_id, time_limit_ms)
            .expect("time limit is positive");
        engine
            .store
            .scenario_mut(ADAPTATION_KIND, game_id, &scenario_id)
            .expect("scenario was just registered")
            .rating = *rating;
    }
}
