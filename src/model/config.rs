use thiserror::Error;
use tracing::warn;

use crate::model::constants::{
    DEFAULT_K_CONSTANT, DEFAULT_K_DOWN, DEFAULT_K_UP, DEFAULT_MAX_DELAY_DAYS, DEFAULT_MAX_PLAY,
    SUPPORT_SPREAD_MULTIPLIER, TARGET_DISTRIBUTION_MEAN, TARGET_DISTRIBUTION_SD, TARGET_LOWER_LIMIT,
    TARGET_UPPER_LIMIT
};

/// One reason a target-distribution combination was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigViolation {
    #[error("target distribution mean {0} is not within the open interval (0, 1)")]
    Mean(f64),

    #[error("target distribution standard deviation {0} is not within the open interval (0, 1)")]
    StandardDeviation(f64),

    #[error("distribution lower limit {0} is not within the closed interval [0, 1]")]
    LowerLimit(f64),

    #[error("distribution lower limit {lower} is not below the mean {mean}")]
    LowerLimitAboveMean { lower: f64, mean: f64 },

    #[error("distribution upper limit {0} is not within the closed interval [0, 1]")]
    UpperLimit(f64),

    #[error("distribution upper limit {upper} is not above the mean {mean}")]
    UpperLimitBelowMean { upper: f64, mean: f64 }
}

/// Target success-probability distribution for scenario selection.
///
/// The four fields validate as a unit: a combination either commits whole
/// or is rejected whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDistribution {
    pub mean: f64,
    pub sd: f64,
    pub lower_limit: f64,
    pub upper_limit: f64
}

impl Default for TargetDistribution {
    fn default() -> Self {
        TargetDistribution {
            mean: TARGET_DISTRIBUTION_MEAN,
            sd: TARGET_DISTRIBUTION_SD,
            lower_limit: TARGET_LOWER_LIMIT,
            upper_limit: TARGET_UPPER_LIMIT
        }
    }
}

impl TargetDistribution {
    /// Pure validation pass: either a fully valid distribution or the
    /// itemized reasons for rejecting the whole combination.
    pub fn validate(mean: f64, sd: f64, lower_limit: f64, upper_limit: f64) -> Result<Self, Vec<ConfigViolation>> {
        let mut violations = Vec::new();

        if mean <= 0.0 || mean >= 1.0 {
            violations.push(ConfigViolation::Mean(mean));
        }

        if sd <= 0.0 || sd >= 1.0 {
            violations.push(ConfigViolation::StandardDeviation(sd));
        }

        if !(0.0..=1.0).contains(&lower_limit) {
            violations.push(ConfigViolation::LowerLimit(lower_limit));
        } else if lower_limit >= mean {
            violations.push(ConfigViolation::LowerLimitAboveMean {
                lower: lower_limit,
                mean
            });
        }

        if !(0.0..=1.0).contains(&upper_limit) {
            violations.push(ConfigViolation::UpperLimit(upper_limit));
        } else if upper_limit <= mean {
            violations.push(ConfigViolation::UpperLimitBelowMean {
                upper: upper_limit,
                mean
            });
        }

        if violations.is_empty() {
            Ok(TargetDistribution {
                mean,
                sd,
                lower_limit,
                upper_limit
            })
        } else {
            Err(violations)
        }
    }
}

/// Rating-update tuning constants. Unlike [`TargetDistribution`], each
/// field validates independently and falls back to its own default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Days of inactivity after which uncertainty reaches its maximum.
    pub max_delay_days: f64,
    /// Administrations after which uncertainty reaches its minimum.
    pub max_play: f64,
    /// K constant applied when there is no uncertainty.
    pub k_constant: f64,
    /// Upward uncertainty weight.
    pub k_up: f64,
    /// Downward uncertainty weight.
    pub k_down: f64,
    /// Spread multiplier for the support-band distribution means.
    pub support_spread_multiplier: f64
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            max_delay_days: DEFAULT_MAX_DELAY_DAYS,
            max_play: DEFAULT_MAX_PLAY,
            k_constant: DEFAULT_K_CONSTANT,
            k_up: DEFAULT_K_UP,
            k_down: DEFAULT_K_DOWN,
            support_spread_multiplier: SUPPORT_SPREAD_MULTIPLIER
        }
    }
}

impl Tuning {
    pub fn set_max_delay_days(&mut self, days: f64) {
        if days <= 0.0 {
            warn!(
                days,
                default = DEFAULT_MAX_DELAY_DAYS,
                "max delay must be positive, falling back to the default"
            );
            self.max_delay_days = DEFAULT_MAX_DELAY_DAYS;
        } else {
            self.max_delay_days = days;
        }
    }

    pub fn set_max_play(&mut self, administrations: f64) {
        if administrations <= 0.0 {
            warn!(
                administrations,
                default = DEFAULT_MAX_PLAY,
                "max play must be positive, falling back to the default"
            );
            self.max_play = DEFAULT_MAX_PLAY;
        } else {
            self.max_play = administrations;
        }
    }

    pub fn set_k_constant(&mut self, k: f64) {
        if k < 0.0 {
            warn!(
                k,
                default = DEFAULT_K_CONSTANT,
                "K constant cannot be negative, falling back to the default"
            );
            self.k_constant = DEFAULT_K_CONSTANT;
        } else {
            self.k_constant = k;
        }
    }

    pub fn set_k_up(&mut self, weight: f64) {
        if weight < 0.0 {
            warn!(
                weight,
                default = DEFAULT_K_UP,
                "upward uncertainty weight cannot be negative, falling back to the default"
            );
            self.k_up = DEFAULT_K_UP;
        } else {
            self.k_up = weight;
        }
    }

    pub fn set_k_down(&mut self, weight: f64) {
        if weight < 0.0 {
            warn!(
                weight,
                default = DEFAULT_K_DOWN,
                "downward uncertainty weight cannot be negative, falling back to the default"
            );
            self.k_down = DEFAULT_K_DOWN;
        } else {
            self.k_down = weight;
        }
    }

    pub fn set_support_spread_multiplier(&mut self, multiplier: f64) {
        if multiplier <= 0.0 {
            warn!(
                multiplier,
                default = SUPPORT_SPREAD_MULTIPLIER,
                "support spread multiplier must be positive, falling back to the default"
            );
            self.support_spread_multiplier = SUPPORT_SPREAD_MULTIPLIER;
        } else {
            self.support_spread_multiplier = multiplier;
        }
    }
}

/// How the next scenario is chosen.
///
/// `NearestBeta` is the pre-fuzzy single-band variant kept for offline
/// research comparisons; it is never the default and shares no tie-break
/// logic with the fuzzy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    #[default]
    Fuzzy,
    NearestBeta {
        /// Use the descending beta transform ln((1-p)/p) instead of the
        /// historical ascending ln(p/(1-p)).
        inverted: bool
    }
}

/// Per-adapter configuration. Held by one adapter instance, never as
/// module-level state, so independent adapters do not interfere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterSettings {
    pub target: TargetDistribution,
    pub tuning: Tuning,
    pub strategy: SelectionStrategy
}

impl AdapterSettings {
    /// Commits the distribution whole, or logs every violation and resets
    /// all four fields to their defaults.
    pub fn set_target_distribution(&mut self, mean: f64, sd: f64, lower_limit: f64, upper_limit: f64) {
        match TargetDistribution::validate(mean, sd, lower_limit, upper_limit) {
            Ok(target) => self.target = target,
            Err(violations) => {
                for violation in &violations {
                    warn!(%violation, "rejected target distribution parameter");
                }
                warn!("invalid target distribution combination, falling back to the defaults");
                self.target = TargetDistribution::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{AdapterSettings, ConfigViolation, SelectionStrategy, TargetDistribution, Tuning};

    #[test]
    fn valid_distribution_commits_whole() {
        let mut settings = AdapterSettings::default();
        settings.set_target_distribution(0.6, 0.05, 0.4, 0.9);

        assert_eq!(
            settings.target,
            TargetDistribution {
                mean: 0.6,
                sd: 0.05,
                lower_limit: 0.4,
                upper_limit: 0.9
            }
        );
    }

    #[test]
    fn one_bad_field_rejects_the_whole_group() {
        let mut settings = AdapterSettings::default();
        settings.set_target_distribution(0.6, 0.05, 0.4, 0.9);

        // sd is invalid; mean/lower/upper are fine but must not survive
        settings.set_target_distribution(0.8, 1.5, 0.6, 0.95);

        assert_eq!(settings.target, TargetDistribution::default());
    }

    #[test]
    fn validation_reports_itemized_reasons() {
        let violations = TargetDistribution::validate(1.2, 0.0, -0.1, 2.0).unwrap_err();

        assert_eq!(
            violations,
            vec![
                ConfigViolation::Mean(1.2),
                ConfigViolation::StandardDeviation(0.0),
                ConfigViolation::LowerLimit(-0.1),
                ConfigViolation::UpperLimit(2.0),
            ]
        );
    }

    #[test]
    fn limits_must_straddle_the_mean() {
        let violations = TargetDistribution::validate(0.5, 0.1, 0.6, 0.4).unwrap_err();

        assert!(violations.contains(&ConfigViolation::LowerLimitAboveMean { lower: 0.6, mean: 0.5 }));
        assert!(violations.contains(&ConfigViolation::UpperLimitBelowMean { upper: 0.4, mean: 0.5 }));
    }

    #[test]
    fn tuning_fields_fall_back_independently() {
        let mut tuning = Tuning::default();

        tuning.set_max_delay_days(60.0);
        tuning.set_max_play(-1.0);
        tuning.set_k_constant(0.01);
        tuning.set_k_up(-4.0);
        tuning.set_k_down(0.25);
        tuning.set_support_spread_multiplier(0.0);

        assert_abs_diff_eq!(tuning.max_delay_days, 60.0);
        assert_abs_diff_eq!(tuning.max_play, 40.0);
        assert_abs_diff_eq!(tuning.k_constant, 0.01);
        assert_abs_diff_eq!(tuning.k_up, 4.0);
        assert_abs_diff_eq!(tuning.k_down, 0.25);
        assert_abs_diff_eq!(tuning.support_spread_multiplier, 1.0);
    }

    #[test]
    fn zero_k_weights_are_accepted() {
        let mut tuning = Tuning::default();

        tuning.set_k_constant(0.0);
        tuning.set_k_up(0.0);
        tuning.set_k_down(0.0);

        assert_abs_diff_eq!(tuning.k_constant, 0.0);
        assert_abs_diff_eq!(tuning.k_up, 0.0);
        assert_abs_diff_eq!(tuning.k_down, 0.0);
    }

    #[test]
    fn fuzzy_selection_is_the_default_strategy() {
        assert_eq!(AdapterSettings::default().strategy, SelectionStrategy::Fuzzy);
    }
}
