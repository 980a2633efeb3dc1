use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{abort, ConflictableTransactionError, TransactionError};
use sled::Transactional;

use crate::store::keys;
use crate::store::operations::attempts::AttemptRecord;
use crate::store::{Store, StoreError};
use crate::trainer::grade::QualityGrade;
use crate::trainer::rating::apply_delta;

/// The item served by the last `next_puzzle` call and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    pub item_id: u32,
    pub rating_at_start: i32,
    pub served_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub player_id: String,
    pub rating: i32,
    #[serde(default)]
    pub items_completed: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub completed_item_ids: BTreeSet<u32>,
    #[serde(default)]
    pub pending: Option<PendingItem>,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlayerState {
    pub fn new(player_id: &str, initial_rating: i32) -> Self {
        Self {
            player_id: player_id.to_string(),
            rating: initial_rating,
            items_completed: 0,
            correct_answers: 0,
            current_streak: 0,
            best_streak: 0,
            completed_item_ids: BTreeSet::new(),
            pending: None,
            revision: 0,
            updated_at: None,
        }
    }

    /// Folds one graded answer into the state. Only a best answer extends the
    /// streak; anything else resets it.
    pub fn apply_answer(&mut self, item_id: u32, delta: i32, grade: QualityGrade, floor: i32) {
        self.rating = apply_delta(self.rating, delta, floor);
        self.items_completed = self.items_completed.saturating_add(1);
        if grade.is_best() {
            self.correct_answers = self.correct_answers.saturating_add(1);
            self.current_streak = self.current_streak.saturating_add(1);
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        self.completed_item_ids.insert(item_id);
        self.pending = None;
    }
}

impl Store {
    /// Missing state reads as a fresh player at `initial_rating`, revision 0.
    pub fn get_player(&self, player_id: &str, initial_rating: i32) -> Result<PlayerState, StoreError> {
        let key = keys::player_key(player_id);
        match self.players.get(key.as_bytes())? {
            Some(raw) => Self::deserialize(&raw),
            None => Ok(PlayerState::new(player_id, initial_rating)),
        }
    }

    /// Writes `state` at `expected_revision + 1`, together with `attempt` when
    /// given. Aborts with `Conflict` if another writer moved the stored
    /// revision since `expected_revision` was read.
    pub fn save_player(
        &self,
        state: &PlayerState,
        expected_revision: u64,
        attempt: Option<&AttemptRecord>,
    ) -> Result<PlayerState, StoreError> {
        if state.player_id.is_empty() {
            return Err(StoreError::Validation("player id must not be empty".to_string()));
        }

        let mut next = state.clone();
        next.revision = expected_revision + 1;
        next.updated_at = Some(Utc::now());

        let key = keys::player_key(&state.player_id);
        let state_bytes = Self::serialize(&next)?;
        let attempt_payload = match attempt {
            Some(record) => Some((self.attempt_storage_key(record)?, Self::serialize(record)?)),
            None => None,
        };

        (&self.players, &self.attempts)
            .transaction(|(tx_players, tx_attempts)| {
                let stored_revision = match tx_players.get(key.as_bytes())? {
                    Some(raw) => {
                        let stored: PlayerState = serde_json::from_slice(&raw).map_err(|error| {
                            ConflictableTransactionError::Abort(StoreError::Serialization(error))
                        })?;
                        stored.revision
                    }
                    None => 0,
                };
                if stored_revision != expected_revision {
                    return abort(StoreError::Conflict {
                        entity: "player".to_string(),
                        key: key.clone(),
                    });
                }

                tx_players.insert(key.as_bytes(), state_bytes.as_slice())?;
                if let Some((attempt_key, attempt_bytes)) = &attempt_payload {
                    tx_attempts.insert(attempt_key.as_bytes(), attempt_bytes.as_slice())?;
                }
                Ok(())
            })
            .map_err(|error: TransactionError<StoreError>| match error {
                TransactionError::Abort(store_error) => store_error,
                TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
            })?;

        Ok(next)
    }

    /// Replaces the player's state with a fresh one at the next revision and
    /// drops their attempt history.
    pub fn reset_player(&self, player_id: &str, initial_rating: i32) -> Result<PlayerState, StoreError> {
        let current = self.get_player(player_id, initial_rating)?;
        let fresh = PlayerState::new(player_id, initial_rating);
        let saved = self.save_player(&fresh, current.revision, None)?;
        let removed = self.clear_attempts(player_id)?;
        tracing::info!(player_id, removed_attempts = removed, "Player progress reset");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path().join("db").to_str().unwrap()).unwrap()
    }

    fn attempt_for(state: &PlayerState, item_id: u32) -> AttemptRecord {
        AttemptRecord {
            id: uuid::Uuid::new_v4().to_string(),
            player_id: state.player_id.clone(),
            item_id,
            choice_id: "b".to_string(),
            grade: QualityGrade::Best,
            delta: 16,
            rating_before: 1200,
            rating_after: 1216,
            expected_outcome: 0.5,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn missing_player_reads_as_default() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let state = store.get_player("new-player", 1200).unwrap();
        assert_eq!(state, PlayerState::new("new-player", 1200));
    }

    #[test]
    fn apply_answer_tracks_streaks_and_floor() {
        let mut state = PlayerState::new("p", 110);
        state.pending = Some(PendingItem {
            item_id: 1,
            rating_at_start: 110,
            served_at: Utc::now(),
        });

        state.apply_answer(1, 12, QualityGrade::Best, 100);
        state.apply_answer(2, 8, QualityGrade::Best, 100);
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.best_streak, 2);
        assert_eq!(state.correct_answers, 2);
        assert!(state.pending.is_none());

        state.apply_answer(3, -40, QualityGrade::Worst, 100);
        assert_eq!(state.rating, 100);
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.best_streak, 2);
        assert_eq!(state.items_completed, 3);
        assert_eq!(state.completed_item_ids.len(), 3);
    }

    #[test]
    fn save_writes_state_and_attempt_together() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let mut state = store.get_player("p1", 1200).unwrap();
        state.apply_answer(7, 16, QualityGrade::Best, 100);
        let record = attempt_for(&state, 7);

        let saved = store.save_player(&state, 0, Some(&record)).unwrap();
        assert_eq!(saved.revision, 1);
        assert!(saved.updated_at.is_some());

        let reloaded = store.get_player("p1", 1200).unwrap();
        assert_eq!(reloaded.rating, 1216);
        assert_eq!(reloaded.revision, 1);
        assert_eq!(store.list_attempts("p1", 10, 0).unwrap(), vec![record]);
    }

    #[test]
    fn stale_revision_is_rejected_without_writing() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let state = store.get_player("p1", 1200).unwrap();
        store.save_player(&state, 0, None).unwrap();

        let mut stale = state.clone();
        stale.apply_answer(3, 20, QualityGrade::Best, 100);
        let record = attempt_for(&stale, 3);
        let err = store.save_player(&stale, 0, Some(&record)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let reloaded = store.get_player("p1", 1200).unwrap();
        assert_eq!(reloaded.rating, 1200);
        assert!(store.list_attempts("p1", 10, 0).unwrap().is_empty());
    }

    #[test]
    fn reset_clears_progress_and_history() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let mut state = store.get_player("p1", 1200).unwrap();
        state.apply_answer(5, 16, QualityGrade::Best, 100);
        let record = attempt_for(&state, 5);
        store.save_player(&state, 0, Some(&record)).unwrap();

        let reset = store.reset_player("p1", 1200).unwrap();
        assert_eq!(reset.revision, 2);
        assert_eq!(reset.rating, 1200);
        assert!(reset.completed_item_ids.is_empty());
        assert!(store.list_attempts("p1", 10, 0).unwrap().is_empty());
    }
}
