use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::constants::PLAYER_LOCK_PRUNE_THRESHOLD;
use crate::corpus::{Attributes, Corpus, Item, Scenario};
use crate::response::AppError;
use crate::store::operations::attempts::AttemptRecord;
use crate::store::operations::players::{PendingItem, PlayerState};
use crate::store::Store;
use crate::trainer::config::TrainerConfig;
use crate::trainer::grade::QualityGrade;
use crate::trainer::ranks::{difficulty_label, rank_progress, RankProgress};
use crate::trainer::rating::{rating_change, RatingChange};
use crate::trainer::selector::{select_next, DifficultyWindow, Selection, SelectionStage};

/// A choice as shown before answering: no grade, no explanation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleView {
    pub id: u32,
    pub title: String,
    pub difficulty_rating: i32,
    pub difficulty_label: &'static str,
    pub attributes: Attributes,
    pub scenario: Scenario,
    pub choices: Vec<ChoiceView>,
    pub tags: Vec<String>,
}

impl From<&Item> for PuzzleView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            difficulty_rating: item.difficulty_rating,
            difficulty_label: difficulty_label(item.difficulty_rating),
            attributes: item.attributes.clone(),
            scenario: item.scenario.clone(),
            choices: item
                .choices
                .iter()
                .map(|c| ChoiceView {
                    id: c.id.clone(),
                    text: c.text.clone(),
                })
                .collect(),
            tags: item.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum NextPuzzle {
    Puzzle {
        puzzle: PuzzleView,
        stage: SelectionStage,
        rating: i32,
        window: DifficultyWindow,
    },
    /// The saved filters exclude every item in the corpus.
    NoMatch { rating: i32, message: String },
}

/// A choice revealed after answering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedChoice {
    pub id: String,
    pub text: String,
    pub quality: QualityGrade,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub puzzle_id: u32,
    pub grade: QualityGrade,
    pub correct: bool,
    pub rating_before: i32,
    pub rating_after: i32,
    pub change: RatingChange,
    pub current_streak: u32,
    pub best_streak: u32,
    pub items_completed: u32,
    pub chosen: RevealedChoice,
    pub best: Option<RevealedChoice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub player_id: String,
    pub rating: i32,
    pub rank: RankProgress,
    pub difficulty_label: &'static str,
    pub items_completed: u32,
    pub correct_answers: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub accuracy_percent: u32,
    pub avg_rating_change: f64,
    pub completed_unique: usize,
    pub corpus_size: usize,
    pub has_pending: bool,
}

pub struct TrainerEngine {
    config: Arc<RwLock<TrainerConfig>>,
    store: Arc<Store>,
    corpus: Arc<Corpus>,
    player_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    rng: std::sync::Mutex<StdRng>,
}

impl TrainerEngine {
    pub fn new(
        config: TrainerConfig,
        store: Arc<Store>,
        corpus: Arc<Corpus>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            corpus,
            player_locks: Arc::new(Mutex::new(HashMap::new())),
            rng: std::sync::Mutex::new(rng),
        }
    }

    pub async fn reload_config(&self, new_config: TrainerConfig) -> Result<(), String> {
        new_config.validate()?;
        let mut cfg = self.config.write().await;
        *cfg = new_config;
        tracing::info!("Trainer config reloaded");
        Ok(())
    }

    pub async fn config(&self) -> TrainerConfig {
        self.config.read().await.clone()
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    async fn acquire_player_lock(&self, player_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.player_locks.lock().await;

        // Only the map holds an idle lock.
        if locks.len() > PLAYER_LOCK_PRUNE_THRESHOLD {
            locks.retain(|_, v| Arc::strong_count(v) > 1);
        }

        locks
            .entry(player_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn next_puzzle(&self, player_id: &str) -> Result<NextPuzzle, AppError> {
        let lock = self.acquire_player_lock(player_id).await;
        let _guard = lock.lock().await;

        let config = self.config.read().await.clone();
        let mut state = self.store.get_player(player_id, config.initial_rating)?;
        let spec = self.store.get_settings(player_id)?;

        let selection = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| AppError::internal("selector rng lock poisoned"))?;
            select_next(
                self.corpus.items(),
                &spec,
                state.rating,
                &state.completed_item_ids,
                &config.selector,
                &mut *rng,
            )
        };

        let (item, stage) = match selection {
            Selection::Picked { item, stage } => (item, stage),
            Selection::NoMatch => {
                tracing::debug!(player_id, "No puzzle matches saved filters");
                return Ok(NextPuzzle::NoMatch {
                    rating: state.rating,
                    message: "No puzzles match your filters. Broaden your settings to keep training."
                        .to_string(),
                });
            }
        };

        let expected_revision = state.revision;
        state.pending = Some(PendingItem {
            item_id: item.id,
            rating_at_start: state.rating,
            served_at: Utc::now(),
        });
        let saved = self.store.save_player(&state, expected_revision, None)?;

        tracing::debug!(player_id, item_id = item.id, ?stage, "Puzzle served");

        Ok(NextPuzzle::Puzzle {
            puzzle: PuzzleView::from(item),
            stage,
            rating: saved.rating,
            window: DifficultyWindow::around(saved.rating, &config.selector),
        })
    }

    pub async fn submit_answer(
        &self,
        player_id: &str,
        puzzle_id: u32,
        choice_id: &str,
    ) -> Result<AnswerOutcome, AppError> {
        let lock = self.acquire_player_lock(player_id).await;
        let _guard = lock.lock().await;

        let config = self.config.read().await.clone();
        let item = self
            .corpus
            .get(puzzle_id)
            .ok_or_else(|| AppError::not_found(&format!("Puzzle {puzzle_id} not found")))?;
        let choice = item.choice(choice_id).ok_or_else(|| {
            AppError::bad_request(
                "INVALID_CHOICE",
                &format!("Puzzle {puzzle_id} has no choice '{choice_id}'"),
            )
        })?;

        let mut state = self.store.get_player(player_id, config.initial_rating)?;
        if state.pending.as_ref().map(|p| p.item_id) != Some(puzzle_id) {
            return Err(AppError::conflict(
                "PUZZLE_NOT_PENDING",
                &format!("Puzzle {puzzle_id} is not awaiting an answer"),
            ));
        }

        let change = rating_change(
            state.rating,
            item.difficulty_rating,
            choice.quality,
            state.items_completed,
            &config.rating,
        );

        let rating_before = state.rating;
        let expected_revision = state.revision;
        state.apply_answer(item.id, change.delta, choice.quality, config.rating_floor);

        let attempt = AttemptRecord {
            id: uuid::Uuid::new_v4().to_string(),
            player_id: player_id.to_string(),
            item_id: item.id,
            choice_id: choice.id.clone(),
            grade: choice.quality,
            delta: change.delta,
            rating_before,
            rating_after: state.rating,
            expected_outcome: change.expected_outcome,
            answered_at: Utc::now(),
        };
        let saved = self
            .store
            .save_player(&state, expected_revision, Some(&attempt))?;

        tracing::debug!(
            player_id,
            item_id = item.id,
            grade = %choice.quality,
            k = change.k_factor,
            raw_delta = change.raw_delta,
            delta = change.delta,
            rating = saved.rating,
            "Answer graded"
        );

        Ok(AnswerOutcome {
            puzzle_id: item.id,
            grade: choice.quality,
            correct: choice.quality.is_best(),
            rating_before,
            rating_after: saved.rating,
            change,
            current_streak: saved.current_streak,
            best_streak: saved.best_streak,
            items_completed: saved.items_completed,
            chosen: reveal(choice),
            best: item.best_choice().map(reveal),
        })
    }

    pub async fn reset_progress(&self, player_id: &str) -> Result<Profile, AppError> {
        let lock = self.acquire_player_lock(player_id).await;
        let _guard = lock.lock().await;

        let config = self.config.read().await.clone();
        let state = self.store.reset_player(player_id, config.initial_rating)?;
        Ok(self.build_profile(&state, &config))
    }

    pub async fn profile(&self, player_id: &str) -> Result<Profile, AppError> {
        let config = self.config.read().await.clone();
        let state = self.store.get_player(player_id, config.initial_rating)?;
        Ok(self.build_profile(&state, &config))
    }

    fn build_profile(&self, state: &PlayerState, config: &TrainerConfig) -> Profile {
        let (accuracy_percent, avg_rating_change) = if state.items_completed == 0 {
            (0, 0.0)
        } else {
            let solved = f64::from(state.items_completed);
            let accuracy = (f64::from(state.correct_answers) / solved * 100.0).round() as u32;
            let avg = f64::from(state.rating - config.initial_rating) / solved;
            (accuracy, (avg * 10.0).round() / 10.0)
        };

        Profile {
            player_id: state.player_id.clone(),
            rating: state.rating,
            rank: rank_progress(state.rating),
            difficulty_label: difficulty_label(state.rating),
            items_completed: state.items_completed,
            correct_answers: state.correct_answers,
            current_streak: state.current_streak,
            best_streak: state.best_streak,
            accuracy_percent,
            avg_rating_change,
            completed_unique: state.completed_item_ids.len(),
            corpus_size: self.corpus.len(),
            has_pending: state.pending.is_some(),
        }
    }
}

fn reveal(choice: &crate::corpus::Choice) -> RevealedChoice {
    RevealedChoice {
        id: choice.id.clone(),
        text: choice.text.clone(),
        quality: choice.quality,
        explanation: choice.explanation.clone(),
    }
}
