use rand::Rng;

use crate::model::interval::FuzzyInterval;

/// A scenario candidate as read from the ratings store.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub scenario_id: String,
    pub rating: f64,
    pub play_count: u32
}

/// Partitions the candidates against the fuzzy interval and picks one.
///
/// Core-band candidates with the least play count win outright; the
/// support band is the first fallback, and candidates outside both bands
/// compete on distance to the nearest core bound, then on play count.
/// The final pick is uniform over whichever subset applies. Returns
/// `None` only for an empty candidate list.
pub fn select_scenario<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[Candidate],
    interval: &FuzzyInterval
) -> Option<String> {
    let mut core: Vec<&str> = Vec::new();
    let mut core_min_plays = 0u32;

    let mut support: Vec<&str> = Vec::new();
    let mut support_min_plays = 0u32;

    let mut out: Vec<&str> = Vec::new();
    let mut out_min_plays = 0u32;
    let mut out_min_distance = 0.0f64;

    for candidate in candidates {
        if interval.in_core(candidate.rating) {
            if core.is_empty() || candidate.play_count < core_min_plays {
                core.clear();
                core.push(&candidate.scenario_id);
                core_min_plays = candidate.play_count;
            } else if candidate.play_count == core_min_plays {
                core.push(&candidate.scenario_id);
            }
        } else if interval.in_support(candidate.rating) {
            if support.is_empty() || candidate.play_count < support_min_plays {
                support.clear();
                support.push(&candidate.scenario_id);
                support_min_plays = candidate.play_count;
            } else if candidate.play_count == support_min_plays {
                support.push(&candidate.scenario_id);
            }
        } else {
            let distance = interval.distance_to_core(candidate.rating);
            if out.is_empty() || distance < out_min_distance {
                out.clear();
                out.push(&candidate.scenario_id);
                out_min_distance = distance;
                out_min_plays = candidate.play_count;
            } else if distance == out_min_distance && candidate.play_count < out_min_plays {
                out.clear();
                out.push(&candidate.scenario_id);
                out_min_plays = candidate.play_count;
            } else if distance == out_min_distance && candidate.play_count == out_min_plays {
                out.push(&candidate.scenario_id);
            }
        }
    }

    let pool = if !core.is_empty() {
        core
    } else if !support.is_empty() {
        support
    } else {
        out
    };

    if pool.is_empty() {
        return None;
    }

    Some(pool[rng.random_range(0..pool.len())].to_string())
}

/// Research-only single-band scan: nearest rating to `target_beta`, with a
/// least-play-count tie-break and first-seen-wins on a full tie. No
/// randomness, deliberately independent of the fuzzy partition above.
pub fn select_nearest(candidates: &[Candidate], target_beta: f64) -> Option<String> {
    let mut best: Option<(&Candidate, f64)> = None;

    for candidate in candidates {
        let distance = (candidate.rating - target_beta).abs();
        match best {
            None => best = Some((candidate, distance)),
            Some((current, best_distance)) => {
                if distance < best_distance || (distance == best_distance && candidate.play_count < current.play_count)
                {
                    best = Some((candidate, distance));
                }
            }
        }
    }

    best.map(|(candidate, _)| candidate.scenario_id.clone())
}
