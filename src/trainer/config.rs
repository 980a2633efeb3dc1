use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INITIAL_RATING, DEFAULT_RATING_FLOOR};
use crate::trainer::grade::QualityGrade;

/// Numeric outcome credited for each answer grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeScores {
    pub best: f64,
    pub good: f64,
    pub bad: f64,
    pub worst: f64,
}

impl Default for GradeScores {
    fn default() -> Self {
        Self {
            best: 1.0,
            good: 0.7,
            bad: 0.3,
            worst: 0.0,
        }
    }
}

impl GradeScores {
    pub fn score(&self, grade: QualityGrade) -> f64 {
        match grade {
            QualityGrade::Best => self.best,
            QualityGrade::Good => self.good,
            QualityGrade::Bad => self.bad,
            QualityGrade::Worst => self.worst,
        }
    }
}

/// K-factor tiers. Checked in order: placement, provisional, established, standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityConfig {
    /// Players with fewer completed items than this are still placing.
    pub placement_items: u32,
    pub placement_k: i32,
    pub provisional_items: u32,
    pub provisional_k: i32,
    /// Established tier needs both enough items and a high rating.
    pub established_items: u32,
    pub established_rating: i32,
    pub established_k: i32,
    pub standard_k: i32,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            placement_items: 10,
            placement_k: 48,
            provisional_items: 30,
            provisional_k: 32,
            established_items: 50,
            established_rating: 1800,
            established_k: 12,
            standard_k: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingConfig {
    pub grade_scores: GradeScores,
    pub sensitivity: SensitivityConfig,
    /// Answers scoring at least this much are never rewarded less than `min_gain`.
    pub min_gain_score: f64,
    pub min_gain: i32,
    pub max_loss: i32,
    pub max_gain: i32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            grade_scores: GradeScores::default(),
            sensitivity: SensitivityConfig::default(),
            min_gain_score: 0.7,
            min_gain: 3,
            max_loss: -40,
            max_gain: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorConfig {
    /// How far below the player rating an on-level item may sit.
    pub lower_slack: i32,
    /// How far above; wider than `lower_slack` to bias toward stretch items.
    pub upper_slack: i32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            lower_slack: 150,
            upper_slack: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerConfig {
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default = "default_initial_rating")]
    pub initial_rating: i32,
    #[serde(default = "default_rating_floor")]
    pub rating_floor: i32,
}

fn default_initial_rating() -> i32 {
    DEFAULT_INITIAL_RATING
}
fn default_rating_floor() -> i32 {
    DEFAULT_RATING_FLOOR
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            rating: RatingConfig::default(),
            selector: SelectorConfig::default(),
            initial_rating: DEFAULT_INITIAL_RATING,
            rating_floor: DEFAULT_RATING_FLOOR,
        }
    }
}

impl TrainerConfig {
    pub fn from_env(env_config: &crate::config::TrainerEnvConfig) -> Self {
        let mut config = Self::default();
        config.initial_rating = env_config.initial_rating;
        config.rating_floor = env_config.rating_floor;
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        let rating = &self.rating;

        let scores = &rating.grade_scores;
        for grade in QualityGrade::ALL {
            if !(0.0..=1.0).contains(&scores.score(grade)) {
                return Err(format!("rating.gradeScores.{grade} must be in [0,1]"));
            }
        }
        if !(scores.worst <= scores.bad && scores.bad <= scores.good && scores.good <= scores.best)
        {
            return Err("rating.gradeScores must be non-decreasing from worst to best".to_string());
        }

        let k = &rating.sensitivity;
        if k.placement_k < 0 || k.provisional_k < 0 || k.established_k < 0 || k.standard_k < 0 {
            return Err("rating.sensitivity K values must be >= 0".to_string());
        }
        if k.placement_items > k.provisional_items {
            return Err(
                "rating.sensitivity.placementItems must not exceed provisionalItems".to_string(),
            );
        }
        if k.provisional_items > k.established_items {
            return Err(
                "rating.sensitivity.provisionalItems must not exceed establishedItems".to_string(),
            );
        }

        if rating.max_loss > 0 {
            return Err("rating.maxLoss must be <= 0".to_string());
        }
        if rating.max_gain < 0 {
            return Err("rating.maxGain must be >= 0".to_string());
        }
        if rating.min_gain < rating.max_loss || rating.min_gain > rating.max_gain {
            return Err("rating.minGain must lie within [maxLoss, maxGain]".to_string());
        }

        if self.selector.lower_slack < 0 || self.selector.upper_slack < 0 {
            return Err("selector slack values must be >= 0".to_string());
        }

        if self.rating_floor < 0 {
            return Err("ratingFloor must be >= 0".to_string());
        }
        if self.initial_rating < self.rating_floor {
            return Err("initialRating must be >= ratingFloor".to_string());
        }

        Ok(())
    }
}
