// Model constants
pub const ADAPTATION_KIND: &str = "skill-difficulty";

/// Provisional skill/difficulty rating assigned to a freshly registered entity.
pub const DEFAULT_RATING: f64 = 0.01;
/// Provisional uncertainty for a freshly registered entity (1 = maximally uncertain).
pub const DEFAULT_UNCERTAINTY: f64 = 1.0;
/// Last-played epoch assigned to a freshly registered entity.
pub const DEFAULT_LAST_PLAYED: &str = "2015-01-01T01:01:01Z";

// Target success-probability distribution defaults
pub const TARGET_DISTRIBUTION_MEAN: f64 = 0.75;
pub const TARGET_DISTRIBUTION_SD: f64 = 0.1;
pub const TARGET_LOWER_LIMIT: f64 = 0.5;
pub const TARGET_UPPER_LIMIT: f64 = 1.0;
/// Spread multiplier for the one-sided distributions that bound the support band.
pub const SUPPORT_SPREAD_MULTIPLIER: f64 = 1.0;

// Uncertainty decay defaults
pub const DEFAULT_MAX_DELAY_DAYS: f64 = 30.0;
pub const DEFAULT_MAX_PLAY: f64 = 40.0;

// K-factor defaults
pub const DEFAULT_K_CONSTANT: f64 = 0.0075;
pub const DEFAULT_K_UP: f64 = 4.0;
pub const DEFAULT_K_DOWN: f64 = 0.5;

// Probability values are clamped to this open interval before the
// inverse-logistic transform, which is undefined at 0 and 1.
pub const PROBABILITY_FLOOR: f64 = 0.001;
pub const PROBABILITY_CEILING: f64 = 0.999;

/// Substituted for a rating gap of exactly zero in the expected-score formula.
pub const RATING_GAP_EPSILON: f64 = 0.001;
