//! Named rating bands shown on the profile.

use serde::Serialize;

struct Band {
    name: &'static str,
    min: i32,
    max: i32,
}

const RANKS: &[Band] = &[
    Band { name: "Fish", min: 0, max: 1000 },
    Band { name: "Novice", min: 1000, max: 1100 },
    Band { name: "Amateur", min: 1100, max: 1200 },
    Band { name: "Regular", min: 1200, max: 1300 },
    Band { name: "Skilled", min: 1300, max: 1400 },
    Band { name: "Veteran", min: 1400, max: 1500 },
    Band { name: "Expert", min: 1500, max: 1600 },
    Band { name: "Master", min: 1600, max: 1700 },
    Band { name: "Grandmaster", min: 1700, max: 1800 },
    Band { name: "Legend", min: 1800, max: 2000 },
];

fn band_index(rating: i32) -> usize {
    RANKS
        .iter()
        .position(|b| rating >= b.min && rating < b.max)
        .unwrap_or(if rating < 0 { 0 } else { RANKS.len() - 1 })
}

pub fn rank_title(rating: i32) -> &'static str {
    RANKS[band_index(rating)].name
}

pub fn difficulty_label(rating: i32) -> &'static str {
    match rating {
        r if r < 1100 => "Beginner",
        r if r < 1300 => "Intermediate",
        r if r < 1500 => "Advanced",
        _ => "Expert",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankProgress {
    pub rank: &'static str,
    pub next_rank: Option<&'static str>,
    pub next_rank_min: Option<i32>,
    pub points_to_next: Option<i32>,
    pub progress_percent: f64,
}

pub fn rank_progress(rating: i32) -> RankProgress {
    let idx = band_index(rating);
    let band = &RANKS[idx];
    let next = RANKS.get(idx + 1);

    let span = f64::from(band.max - band.min);
    let progress = (f64::from(rating - band.min) / span * 100.0).clamp(0.0, 100.0);

    RankProgress {
        rank: band.name,
        next_rank: next.map(|b| b.name),
        next_rank_min: next.map(|b| b.min),
        points_to_next: next.map(|b| b.min - rating),
        progress_percent: (progress * 10.0).round() / 10.0,
    }
}
