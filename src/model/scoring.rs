use tracing::{error, warn};

use crate::model::{constants::RATING_GAP_EPSILON, error::AdaptError};

/// Performance score actually achieved on one play.
///
/// Rewards fast correct answers and penalizes fast incorrect ones
/// symmetrically: with discrimination a = 1/time_limit the result is
/// (2*accuracy - 1) * a * (time_limit - response_time), in [-1, 1].
///
/// A response time above the time limit is clamped to the limit before
/// scoring. Invalid inputs abort with a logged error.
pub fn actual_score(accuracy: f64, response_time_ms: f64, time_limit_ms: f64) -> Result<f64, AdaptError> {
    validate_accuracy(accuracy)?;
    validate_response_time(response_time_ms)?;
    validate_time_limit(time_limit_ms)?;

    let mut response_time_ms = response_time_ms;
    if response_time_ms > time_limit_ms {
        warn!(
            response_time_ms,
            time_limit_ms, "response time exceeds the scenario time limit, clamping to the limit"
        );
        response_time_ms = time_limit_ms;
    }

    let discrimination = discrimination_param(time_limit_ms);
    Ok((2.0 * accuracy - 1.0) * ((discrimination * time_limit_ms) - (discrimination * response_time_ms)))
}

/// Performance score expected from the gap between skill and difficulty.
///
/// With weight w = a * time_limit (identically 1 by construction) and
/// gap d = theta - beta, the score is w*(e+1)/(e-1) - 1/d where
/// e = exp(2*w*d). Odd-symmetric in d, saturating toward +/-1 as |d|
/// grows. A gap of exactly zero is substituted with a small epsilon to
/// keep the 1/d term finite.
///
/// The caller guarantees a positive time limit; scenario registration
/// rejects anything else.
pub fn expected_score(theta: f64, beta: f64, time_limit_ms: f64) -> f64 {
    let weight = discrimination_param(time_limit_ms) * time_limit_ms;

    let mut gap = theta - beta;
    if gap == 0.0 {
        gap = RATING_GAP_EPSILON;
    }

    let exp_factor = (2.0 * weight * gap).exp();
    (weight * ((exp_factor + 1.0) / (exp_factor - 1.0))) - (1.0 / gap)
}

/// Discrimination parameter a = 1/time_limit shared by both score formulas.
fn discrimination_param(time_limit_ms: f64) -> f64 {
    1.0 / time_limit_ms
}

pub(crate) fn validate_accuracy(accuracy: f64) -> Result<(), AdaptError> {
    if accuracy != 0.0 && accuracy != 1.0 {
        error!(accuracy, "accuracy must be either 0 or 1");
        return Err(AdaptError::InvalidAccuracy(accuracy));
    }

    Ok(())
}

pub(crate) fn validate_response_time(response_time_ms: f64) -> Result<(), AdaptError> {
    if response_time_ms <= 0.0 {
        error!(response_time_ms, "response time must be positive");
        return Err(AdaptError::InvalidResponseTime(response_time_ms));
    }

    Ok(())
}

pub(crate) fn validate_time_limit(time_limit_ms: f64) -> Result<(), AdaptError> {
    if time_limit_ms <= 0.0 {
        error!(time_limit_ms, "scenario time limit must be positive");
        return Err(AdaptError::InvalidTimeLimit(time_limit_ms));
    }

    Ok(())
}
