//! ELO-style rating updates with graded (non-binary) outcomes.
//!
//! Everything here is pure: callers pass a snapshot of the player and get a
//! signed delta back. Applying the delta and the rating floor is the caller's job.

use serde::Serialize;

use crate::trainer::config::{GradeScores, RatingConfig, SensitivityConfig};
use crate::trainer::grade::QualityGrade;

/// Rating gap (in points) that makes the favourite ten times as likely to win.
pub const LOGISTIC_SCALE: f64 = 400.0;

/// Probability that a player at `player_rating` gives the top-grade answer
/// on an item rated `item_difficulty`.
pub fn expected_outcome(player_rating: i32, item_difficulty: i32) -> f64 {
    let gap = f64::from(item_difficulty) - f64::from(player_rating);
    1.0 / (1.0 + 10.0_f64.powf(gap / LOGISTIC_SCALE))
}

pub fn grade_to_score(grade: QualityGrade, scores: &GradeScores) -> f64 {
    scores.score(grade)
}

pub fn select_sensitivity(items_completed: u32, player_rating: i32, k: &SensitivityConfig) -> i32 {
    if items_completed < k.placement_items {
        k.placement_k
    } else if items_completed < k.provisional_items {
        k.provisional_k
    } else if items_completed >= k.established_items && player_rating >= k.established_rating {
        k.established_k
    } else {
        k.standard_k
    }
}

/// Every intermediate value of one rating update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub expected_outcome: f64,
    pub actual_score: f64,
    pub k_factor: i32,
    /// `round(K * (actual - expected))` before the floor and caps.
    pub raw_delta: i32,
    pub delta: i32,
}

pub fn rating_change(
    player_rating: i32,
    item_difficulty: i32,
    grade: QualityGrade,
    items_completed: u32,
    config: &RatingConfig,
) -> RatingChange {
    let expected = expected_outcome(player_rating, item_difficulty);
    let actual = grade_to_score(grade, &config.grade_scores);
    let k = select_sensitivity(items_completed, player_rating, &config.sensitivity);

    let raw_delta = (f64::from(k) * (actual - expected)).round() as i32;

    let mut delta = raw_delta;
    if actual >= config.min_gain_score && delta < config.min_gain {
        delta = config.min_gain;
    }
    delta = delta.clamp(config.max_loss, config.max_gain);

    RatingChange {
        expected_outcome: expected,
        actual_score: actual,
        k_factor: k,
        raw_delta,
        delta,
    }
}

pub fn compute_rating_delta(
    player_rating: i32,
    item_difficulty: i32,
    grade: QualityGrade,
    items_completed: u32,
    config: &RatingConfig,
) -> i32 {
    rating_change(player_rating, item_difficulty, grade, items_completed, config).delta
}

/// Applies `delta` to `rating` without letting it drop below `floor`.
pub fn apply_delta(rating: i32, delta: i32, floor: i32) -> i32 {
    rating.saturating_add(delta).max(floor)
}
