pub mod model;
pub mod utils;

pub use model::{
    adapter_model::AdapterModel,
    config::{AdapterSettings, ConfigViolation, SelectionStrategy, TargetDistribution, Tuning},
    error::AdaptError,
    history::GameplayLog,
    interval::FuzzyInterval,
    rating_store::{AdaptationStore, MemoryStore},
    structures::{
        gameplay_record::GameplayRecord, player_record::PlayerRecord, rating_update::RatingUpdate,
        scenario_record::ScenarioRecord
    }
};
