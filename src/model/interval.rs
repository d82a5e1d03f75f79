use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::model::{
    config::TargetDistribution,
    constants::{PROBABILITY_CEILING, PROBABILITY_FLOOR}
};

/// Fuzzy interval of acceptable difficulty ratings, ascending:
/// the core band is the tight range, the support band the wider one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyInterval {
    pub support_lower: f64,
    pub core_lower: f64,
    pub core_upper: f64,
    pub support_upper: f64
}

impl FuzzyInterval {
    pub fn in_core(&self, rating: f64) -> bool {
        rating >= self.core_lower && rating <= self.core_upper
    }

    pub fn in_support(&self, rating: f64) -> bool {
        rating >= self.support_lower && rating <= self.support_upper
    }

    /// Distance from a rating to the nearest core bound.
    pub fn distance_to_core(&self, rating: f64) -> f64 {
        (rating - self.core_lower).abs().min((rating - self.core_upper).abs())
    }
}

/// Side of a one-sided normal draw.
enum Tail {
    Lower,
    Upper
}

/// Samples the fuzzy interval of target difficulty ratings for a player
/// with skill rating `theta`.
///
/// Two draws from Normal(mean, sd) bound the core band in probability
/// space; one-sided draws below and above the spread-adjusted helper means
/// bound the support band, re-drawn until they fall strictly outside the
/// core. Each probability then maps to a rating through the
/// inverse-logistic transform anchored at `theta`.
pub fn target_beta_interval<R: Rng + ?Sized>(
    rng: &mut R,
    theta: f64,
    target: &TargetDistribution,
    spread_multiplier: f64
) -> FuzzyInterval {
    // Means of the one-sided distributions that bound the support band
    let lower_mean = (target.mean - (spread_multiplier * target.sd)).max(PROBABILITY_FLOOR);
    let upper_mean = (target.mean + (spread_multiplier * target.sd)).min(PROBABILITY_CEILING);

    let core_distribution = Normal::new(target.mean, target.sd).expect("validated sd is positive and finite");

    // Core band bounds in probability space. The acceptance test is an
    // or-condition over the two limits; every draw satisfies it, so draws
    // are clamped to the probability window rather than re-drawn.
    let mut core_bounds = [0.0f64; 2];
    for bound in core_bounds.iter_mut() {
        *bound = loop {
            let draw: f64 = core_distribution.sample(rng);
            if draw > target.lower_limit || draw < target.upper_limit {
                break draw.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING);
            }
        };
    }
    if core_bounds[0] > core_bounds[1] {
        core_bounds.swap(0, 1);
    }

    // Support band bounds, strictly outside the core on each side
    let support_lower_p = loop {
        let draw = one_sided(rng, lower_mean, target.sd, Tail::Lower);
        if draw < core_bounds[0] {
            break draw.max(PROBABILITY_FLOOR);
        }
    };
    let support_upper_p = loop {
        let draw = one_sided(rng, upper_mean, target.sd, Tail::Upper);
        if draw > core_bounds[1] {
            break draw.min(PROBABILITY_CEILING);
        }
    };

    // The transform is strictly decreasing in p, so ascending probabilities
    // come out as descending ratings; re-sort to keep the interval ascending.
    let mut betas = [
        beta_for_probability(theta, support_upper_p),
        beta_for_probability(theta, core_bounds[1]),
        beta_for_probability(theta, core_bounds[0]),
        beta_for_probability(theta, support_lower_p),
    ];
    betas.sort_by(|a, b| a.partial_cmp(b).expect("betas are finite"));

    FuzzyInterval {
        support_lower: betas[0],
        core_lower: betas[1],
        core_upper: betas[2],
        support_upper: betas[3]
    }
}

/// Difficulty rating at which a player rated `theta` succeeds with
/// probability `p`: beta = theta + ln((1 - p) / p).
pub fn beta_for_probability(theta: f64, p: f64) -> f64 {
    theta + ((1.0 - p) / p).ln()
}

fn one_sided<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64, tail: Tail) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    match tail {
        Tail::Lower => mean - (z.abs() * sd),
        Tail::Upper => mean + (z.abs() * sd)
    }
}
