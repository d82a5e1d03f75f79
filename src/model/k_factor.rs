use crate::model::config::Tuning;

/// K-factor for the player's rating swing.
///
/// The entity's own uncertainty widens its swing; the opponent's
/// uncertainty dampens it. The output is deliberately unclamped.
pub fn theta_k_factor(tuning: &Tuning, theta_uncertainty: f64, beta_uncertainty: f64) -> f64 {
    tuning.k_constant * (1.0 + (tuning.k_up * theta_uncertainty) - (tuning.k_down * beta_uncertainty))
}

/// K-factor for the scenario's rating swing, with the roles swapped.
pub fn beta_k_factor(tuning: &Tuning, theta_uncertainty: f64, beta_uncertainty: f64) -> f64 {
    tuning.k_constant * (1.0 + (tuning.k_up * beta_uncertainty) - (tuning.k_down * theta_uncertainty))
}
