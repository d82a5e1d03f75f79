use chrono::{DateTime, Utc};

/// Next uncertainty value for a rating.
///
/// Each administration removes 1/max_play of uncertainty; each day of
/// inactivity restores delay_days/max_delay of it. The result is clamped
/// to [0, 1], so repeated zero-delay plays saturate at full confidence.
/// The rule is identical for players and scenarios.
pub fn next_uncertainty(current: f64, delay_days: f64, max_play: f64, max_delay: f64) -> f64 {
    (current - (1.0 / max_play) + (delay_days / max_delay)).clamp(0.0, 1.0)
}

/// Whole days elapsed since an entity was last played, clamped to
/// [0, max_delay]. A last-played timestamp in the future counts as zero.
pub fn delay_days(last_played: DateTime<Utc>, now: DateTime<Utc>, max_delay: f64) -> f64 {
    let days = (now - last_played).num_days() as f64;
    days.clamp(0.0, max_delay)
}
