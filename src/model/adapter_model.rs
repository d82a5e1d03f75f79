use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::error;

use crate::model::{
    config::{AdapterSettings, SelectionStrategy},
    constants::{ADAPTATION_KIND, TARGET_DISTRIBUTION_MEAN, TARGET_DISTRIBUTION_SD, TARGET_LOWER_LIMIT, TARGET_UPPER_LIMIT},
    error::AdaptError,
    history::GameplayLog,
    interval::{beta_for_probability, target_beta_interval},
    k_factor::{beta_k_factor, theta_k_factor},
    rating_store::{AdaptationStore, MemoryStore},
    scoring::{actual_score, expected_score, validate_accuracy, validate_response_time},
    selector::{select_nearest, select_scenario, Candidate},
    structures::{gameplay_record::GameplayRecord, rating_update::RatingUpdate},
    uncertainty::{delay_days, next_uncertainty}
};

/// The difficulty-to-skill adaptation engine.
///
/// Owns the ratings store, the append-only gameplay history, the
/// per-instance settings and the random source. Instances are fully
/// independent, so one engine per game keeps configurations isolated.
pub struct AdapterModel<S = MemoryStore, R = StdRng>
where
    S: AdaptationStore,
    R: Rng
{
    pub store: S,
    pub history: GameplayLog,
    settings: AdapterSettings,
    rng: R
}

impl AdapterModel<MemoryStore, StdRng> {
    pub fn new() -> AdapterModel<MemoryStore, StdRng> {
        AdapterModel::with_parts(MemoryStore::new(), StdRng::from_os_rng())
    }
}

impl Default for AdapterModel<MemoryStore, StdRng> {
    fn default() -> Self {
        AdapterModel::new()
    }
}

impl<R: Rng> AdapterModel<MemoryStore, R> {
    /// An engine over the in-memory store with an injected random source,
    /// the usual constructor for reproducible runs.
    pub fn with_rng(rng: R) -> AdapterModel<MemoryStore, R> {
        AdapterModel::with_parts(MemoryStore::new(), rng)
    }
}

impl<S: AdaptationStore, R: Rng> AdapterModel<S, R> {
    pub fn with_parts(store: S, rng: R) -> AdapterModel<S, R> {
        AdapterModel {
            store,
            history: GameplayLog::new(),
            settings: AdapterSettings::default(),
            rng
        }
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AdapterSettings {
        &mut self.settings
    }

    /// See [`AdapterSettings::set_target_distribution`].
    pub fn set_target_distribution(&mut self, mean: f64, sd: f64, lower_limit: f64, upper_limit: f64) {
        self.settings.set_target_distribution(mean, sd, lower_limit, upper_limit);
    }

    /// Applies one play outcome to both parties' ratings at the current
    /// UTC time. See [`AdapterModel::update_ratings_at`].
    pub fn update_ratings(
        &mut self,
        game_id: &str,
        player_id: &str,
        scenario_id: &str,
        response_time_ms: f64,
        accuracy: f64,
        persist: bool
    ) -> Result<RatingUpdate, AdaptError> {
        self.update_ratings_at(game_id, player_id, scenario_id, response_time_ms, accuracy, persist, Utc::now())
    }

    /// Applies one play outcome with an explicit clock, for replays and
    /// tests.
    ///
    /// The update is all-or-nothing: both records are fetched before the
    /// first write, so every failure leaves the store untouched. On
    /// success both ratings, play counts, uncertainties, K-factors and
    /// last-played timestamps are written back, the store's save hook runs
    /// when `persist` is set, and exactly one history record is appended.
    pub fn update_ratings_at(
        &mut self,
        game_id: &str,
        player_id: &str,
        scenario_id: &str,
        response_time_ms: f64,
        accuracy: f64,
        persist: bool,
        now: DateTime<Utc>
    ) -> Result<RatingUpdate, AdaptError> {
        if let Err(err) = validate_accuracy(accuracy).and_then(|_| validate_response_time(response_time_ms)) {
            error!("unable to update ratings, invalid response time and/or accuracy");
            return Err(err);
        }

        let player = match self.store.player(ADAPTATION_KIND, game_id, player_id) {
            Ok(record) => record.clone(),
            Err(err) => {
                error!(%err, "unable to update ratings, player data is missing");
                return Err(err);
            }
        };

        let scenario = match self.store.scenario(ADAPTATION_KIND, game_id, scenario_id) {
            Ok(record) => record.clone(),
            Err(err) => {
                error!(%err, "unable to update ratings, scenario data is missing");
                return Err(err);
            }
        };

        let tuning = self.settings.tuning;

        let player_delay = delay_days(player.last_played, now, tuning.max_delay_days);
        let scenario_delay = delay_days(scenario.last_played, now, tuning.max_delay_days);

        let actual = actual_score(accuracy, response_time_ms, scenario.time_limit_ms)?;
        let expected = expected_score(player.rating, scenario.rating, scenario.time_limit_ms);

        let player_uncertainty = next_uncertainty(player.uncertainty, player_delay, tuning.max_play, tuning.max_delay_days);
        let scenario_uncertainty =
            next_uncertainty(scenario.uncertainty, scenario_delay, tuning.max_play, tuning.max_delay_days);

        let player_k = theta_k_factor(&tuning, player_uncertainty, scenario_uncertainty);
        let scenario_k = beta_k_factor(&tuning, player_uncertainty, scenario_uncertainty);

        // Opposite signs: rating mass exchanged between the parties
        let player_rating = player.rating + (player_k * (actual - expected));
        let scenario_rating = scenario.rating + (scenario_k * (expected - actual));

        // Both lookups succeeded above, so the write-backs cannot fail
        // halfway through
        let record = self.store.player_mut(ADAPTATION_KIND, game_id, player_id)?;
        record.rating = player_rating;
        record.play_count += 1;
        record.uncertainty = player_uncertainty;
        record.k_factor = player_k;
        record.last_played = now;

        let record = self.store.scenario_mut(ADAPTATION_KIND, game_id, scenario_id)?;
        record.rating = scenario_rating;
        record.play_count += 1;
        record.uncertainty = scenario_uncertainty;
        record.k_factor = scenario_k;
        record.last_played = now;

        if persist {
            self.store.save();
        }

        self.history.append(GameplayRecord {
            id: 0,
            adaptation: ADAPTATION_KIND.to_string(),
            game_id: game_id.to_string(),
            player_id: player_id.to_string(),
            scenario_id: scenario_id.to_string(),
            timestamp: now,
            response_time_ms,
            accuracy,
            player_rating,
            scenario_rating,
            persisted: persist
        });

        Ok(RatingUpdate {
            actual_score: actual,
            expected_score: expected,
            player_rating_before: player.rating,
            player_rating_after: player_rating,
            player_k_factor: player_k,
            scenario_rating_before: scenario.rating,
            scenario_rating_after: scenario_rating,
            scenario_k_factor: scenario_k,
            timestamp: now
        })
    }

    /// Recommends the scenario whose difficulty best matches the player's
    /// current skill under the configured selection strategy.
    pub fn target_scenario_id(&mut self, game_id: &str, player_id: &str) -> Result<String, AdaptError> {
        let theta = match self.store.player(ADAPTATION_KIND, game_id, player_id) {
            Ok(record) => record.rating,
            Err(err) => {
                error!(%err, "unable to recommend a scenario, player data is missing");
                return Err(err);
            }
        };

        let scenario_ids = self.store.scenario_ids(ADAPTATION_KIND, game_id);
        if scenario_ids.is_empty() {
            let err = AdaptError::NoScenarios(game_id.to_string());
            error!(%err, "unable to recommend a scenario");
            return Err(err);
        }

        let mut candidates = Vec::with_capacity(scenario_ids.len());
        for scenario_id in &scenario_ids {
            if scenario_id.is_empty() {
                let err = AdaptError::EmptyScenarioId(game_id.to_string());
                error!(%err, "unable to recommend a scenario");
                return Err(err);
            }

            let record = self.store.scenario(ADAPTATION_KIND, game_id, scenario_id)?;
            candidates.push(Candidate {
                scenario_id: scenario_id.clone(),
                rating: record.rating,
                play_count: record.play_count
            });
        }

        let picked = match self.settings.strategy {
            SelectionStrategy::Fuzzy => {
                let interval = target_beta_interval(
                    &mut self.rng,
                    theta,
                    &self.settings.target,
                    self.settings.tuning.support_spread_multiplier
                );
                select_scenario(&mut self.rng, &candidates, &interval)
            }
            SelectionStrategy::NearestBeta { inverted } => {
                let target_beta = self.nearest_target_beta(theta, inverted);
                select_nearest(&candidates, target_beta)
            }
        };

        picked.ok_or_else(|| {
            let err = AdaptError::NoScenarios(game_id.to_string());
            error!(%err, "scenario selection produced no candidate");
            err
        })
    }

    /// Single target draw for the research-only nearest-beta strategy.
    /// Reads the default distribution constants, not the configured ones.
    fn nearest_target_beta(&mut self, theta: f64, inverted: bool) -> f64 {
        let distribution =
            Normal::new(TARGET_DISTRIBUTION_MEAN, TARGET_DISTRIBUTION_SD).expect("default sd is positive");

        let p = loop {
            let draw: f64 = distribution.sample(&mut self.rng);
            if draw > TARGET_LOWER_LIMIT && draw < TARGET_UPPER_LIMIT {
                break draw;
            }
        };

        if inverted {
            beta_for_probability(theta, p)
        } else {
            theta + (p / (1.0 - p)).ln()
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::AdapterModel;
    use crate::model::{
        config::SelectionStrategy,
        constants::ADAPTATION_KIND,
        error::AdaptError,
        interval::beta_for_probability,
        rating_store::{AdaptationStore, MemoryStore}
    };

    const GAME: &str = "colorflood";

    fn engine() -> AdapterModel<MemoryStore, ChaCha8Rng> {
        AdapterModel::with_rng(ChaCha8Rng::seed_from_u64(42))
    }

    fn seeded_engine(seed: u64) -> AdapterModel<MemoryStore, ChaCha8Rng> {
        AdapterModel::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn successful_fast_answer_moves_ratings_in_opposite_directions() {
        let mut engine = engine();
        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "s1", 120_000.0).unwrap();

        let update = engine.update_ratings(GAME, "alice", "s1", 60_000.0, 1.0, false).unwrap();

        assert_abs_diff_eq!(update.actual_score, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(update.expected_score, 0.001 / 3.0, epsilon = 1e-6);

        // A fast correct answer raises the player's skill rating and
        // lowers the scenario's difficulty rating by the same magnitude
        // (the K-factors coincide while both uncertainties are 1)
        assert!(update.player_rating_after > update.player_rating_before);
        assert!(update.scenario_rating_after < update.scenario_rating_before);

        let player_delta = update.player_rating_after - update.player_rating_before;
        let scenario_delta = update.scenario_rating_after - update.scenario_rating_before;
        assert!(player_delta.signum() != scenario_delta.signum());
        assert_abs_diff_eq!(player_delta, -scenario_delta, epsilon = 1e-12);

        let player = engine.store.player(ADAPTATION_KIND, GAME, "alice").unwrap();
        let scenario = engine.store.scenario(ADAPTATION_KIND, GAME, "s1").unwrap();
        assert_eq!(player.play_count, 1);
        assert_eq!(scenario.play_count, 1);
        assert_abs_diff_eq!(player.rating, update.player_rating_after);
        assert_abs_diff_eq!(scenario.rating, update.scenario_rating_after);
    }

    #[test]
    fn update_writes_timestamps_and_history_once() {
        let mut engine = engine();
        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "s1", 60_000.0).unwrap();

        let now = Utc::now();
        engine.update_ratings_at(GAME, "alice", "s1", 10_000.0, 0.0, true, now).unwrap();

        assert_eq!(engine.store.player(ADAPTATION_KIND, GAME, "alice").unwrap().last_played, now);
        assert_eq!(engine.store.scenario(ADAPTATION_KIND, GAME, "s1").unwrap().last_played, now);

        assert_eq!(engine.history.len(), 1);
        let record = &engine.history.records()[0];
        assert_eq!(record.id, 0);
        assert_eq!(record.player_id, "alice");
        assert_eq!(record.scenario_id, "s1");
        assert_abs_diff_eq!(record.accuracy, 0.0);
        assert!(record.persisted);
        assert_eq!(record.timestamp, now);
    }

    #[test]
    fn unknown_player_aborts_without_touching_the_scenario() {
        let mut engine = engine();
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "s1", 60_000.0).unwrap();
        let before = engine.store.scenario(ADAPTATION_KIND, GAME, "s1").unwrap().clone();

        let result = engine.update_ratings(GAME, "ghost", "s1", 5_000.0, 1.0, false);

        assert!(matches!(result, Err(AdaptError::UnknownPlayer { .. })));
        assert_eq!(engine.store.scenario(ADAPTATION_KIND, GAME, "s1").unwrap(), &before);
        assert!(engine.history.is_empty());
    }

    #[test]
    fn unknown_scenario_aborts_without_touching_the_player() {
        let mut engine = engine();
        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        let before = engine.store.player(ADAPTATION_KIND, GAME, "alice").unwrap().clone();

        let result = engine.update_ratings(GAME, "alice", "ghost", 5_000.0, 1.0, false);

        assert!(matches!(result, Err(AdaptError::UnknownScenario { .. })));
        assert_eq!(engine.store.player(ADAPTATION_KIND, GAME, "alice").unwrap(), &before);
        assert!(engine.history.is_empty());
    }

    #[test]
    fn invalid_outcome_aborts_before_any_lookup_effects() {
        let mut engine = engine();
        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "s1", 60_000.0).unwrap();

        assert_eq!(
            engine.update_ratings(GAME, "alice", "s1", 5_000.0, 0.5, false),
            Err(AdaptError::InvalidAccuracy(0.5))
        );
        assert_eq!(
            engine.update_ratings(GAME, "alice", "s1", -1.0, 1.0, false),
            Err(AdaptError::InvalidResponseTime(-1.0))
        );

        assert_eq!(engine.store.player(ADAPTATION_KIND, GAME, "alice").unwrap().play_count, 0);
        assert_eq!(engine.store.scenario(ADAPTATION_KIND, GAME, "s1").unwrap().play_count, 0);
        assert!(engine.history.is_empty());
    }

    #[test]
    fn recommendation_requires_a_known_player_and_scenarios() {
        let mut engine = engine();

        assert!(matches!(
            engine.target_scenario_id(GAME, "ghost"),
            Err(AdaptError::UnknownPlayer { .. })
        ));

        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        assert_eq!(
            engine.target_scenario_id(GAME, "alice"),
            Err(AdaptError::NoScenarios(GAME.to_string()))
        );
    }

    #[test]
    fn fresh_scenario_at_the_core_midpoint_is_always_recommended() {
        let mut engine = engine();
        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        engine.store.player_mut(ADAPTATION_KIND, GAME, "alice").unwrap().rating = 0.0;

        // One never-played scenario pinned to the difficulty matching the
        // target mean success probability; the rest far outside any
        // possible support band and already played
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "mid", 60_000.0).unwrap();
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "too-hard", 60_000.0).unwrap();
        engine.store.register_scenario(ADAPTATION_KIND, GAME, "too-easy", 60_000.0).unwrap();

        let mid = engine.store.scenario_mut(ADAPTATION_KIND, GAME, "mid").unwrap();
        mid.rating = beta_for_probability(0.0, 0.75);
        mid.play_count = 0;

        let hard = engine.store.scenario_mut(ADAPTATION_KIND, GAME, "too-hard").unwrap();
        hard.rating = 8.0;
        hard.play_count = 3;

        let easy = engine.store.scenario_mut(ADAPTATION_KIND, GAME, "too-easy").unwrap();
        easy.rating = -8.0;
        easy.play_count = 3;

        for _ in 0..100 {
            assert_eq!(engine.target_scenario_id(GAME, "alice").unwrap(), "mid");
        }
    }

    #[test]
    fn recommendation_stays_within_the_registered_scenarios() {
        let mut engine = seeded_engine(9);
        engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
        for id in ["s1", "s2", "s3"] {
            engine.store.register_scenario(ADAPTATION_KIND, GAME, id, 60_000.0).unwrap();
        }

        for _ in 0..50 {
            let picked = engine.target_scenario_id(GAME, "alice").unwrap();
            assert!(["s1", "s2", "s3"].contains(&picked.as_str()));
        }
    }

    #[test]
    fn nearest_beta_strategy_follows_the_transform_sign() {
        for (inverted, expected_pick) in [(false, "above"), (true, "below")] {
            let mut engine = seeded_engine(17);
            engine.settings_mut().strategy = SelectionStrategy::NearestBeta { inverted };

            engine.store.register_player(ADAPTATION_KIND, GAME, "alice");
            engine.store.player_mut(ADAPTATION_KIND, GAME, "alice").unwrap().rating = 0.0;

            engine.store.register_scenario(ADAPTATION_KIND, GAME, "above", 60_000.0).unwrap();
            engine.store.register_scenario(ADAPTATION_KIND, GAME, "below", 60_000.0).unwrap();
            engine.store.scenario_mut(ADAPTATION_KIND, GAME, "above").unwrap().rating = 2.0;
            engine.store.scenario_mut(ADAPTATION_KIND, GAME, "below").unwrap().rating = -2.0;

            // The historical transform targets betas above theta, the
            // inverted one below; each consistently picks its own side
            for _ in 0..25 {
                assert_eq!(engine.target_scenario_id(GAME, "alice").unwrap(), expected_pick);
            }
        }
    }
}
