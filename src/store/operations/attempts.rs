use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::trainer::grade::QualityGrade;

/// One answered puzzle, written in the same transaction as the player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: String,
    pub player_id: String,
    pub item_id: u32,
    pub choice_id: String,
    pub grade: QualityGrade,
    pub delta: i32,
    pub rating_before: i32,
    pub rating_after: i32,
    pub expected_outcome: f64,
    pub answered_at: DateTime<Utc>,
}

impl Store {
    pub(crate) fn attempt_storage_key(&self, record: &AttemptRecord) -> Result<String, StoreError> {
        let seq = self.next_id()?;
        Ok(keys::attempt_key(
            &record.player_id,
            record.answered_at.timestamp_millis(),
            seq,
        ))
    }

    /// Newest first.
    pub fn list_attempts(
        &self,
        player_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AttemptRecord>, StoreError> {
        let prefix = keys::attempt_prefix(player_id);
        let mut attempts = Vec::new();
        if limit == 0 {
            return Ok(attempts);
        }

        for item in self.attempts.scan_prefix(prefix.as_bytes()).skip(offset) {
            let (_, value) = item?;
            attempts.push(Self::deserialize::<AttemptRecord>(&value)?);
            if attempts.len() >= limit {
                break;
            }
        }
        Ok(attempts)
    }

    pub fn count_attempts(&self, player_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::attempt_prefix(player_id);
        let mut count = 0;
        for item in self.attempts.scan_prefix(prefix.as_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    pub fn clear_attempts(&self, player_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::attempt_prefix(player_id);
        let mut batch = sled::Batch::default();
        let mut removed = 0;
        for item in self.attempts.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            batch.remove(key);
            removed += 1;
        }
        self.attempts.apply_batch(batch)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::tempdir;

    use super::*;

    fn attempt(player_id: &str, item_id: u32, answered_at: DateTime<Utc>) -> AttemptRecord {
        AttemptRecord {
            id: uuid::Uuid::new_v4().to_string(),
            player_id: player_id.to_string(),
            item_id,
            choice_id: "a".to_string(),
            grade: QualityGrade::Good,
            delta: 5,
            rating_before: 1200,
            rating_after: 1205,
            expected_outcome: 0.5,
            answered_at,
        }
    }

    #[test]
    fn attempts_page_newest_first() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let base = Utc::now();

        for (i, item_id) in [10u32, 11, 12].into_iter().enumerate() {
            let record = attempt("p1", item_id, base + Duration::seconds(i as i64));
            let key = store.attempt_storage_key(&record).unwrap();
            store
                .attempts
                .insert(key.as_bytes(), Store::serialize(&record).unwrap())
                .unwrap();
        }
        let other = attempt("p2", 99, base);
        let key = store.attempt_storage_key(&other).unwrap();
        store
            .attempts
            .insert(key.as_bytes(), Store::serialize(&other).unwrap())
            .unwrap();

        let page = store.list_attempts("p1", 2, 0).unwrap();
        assert_eq!(page.iter().map(|a| a.item_id).collect::<Vec<_>>(), vec![12, 11]);

        let rest = store.list_attempts("p1", 2, 2).unwrap();
        assert_eq!(rest.iter().map(|a| a.item_id).collect::<Vec<_>>(), vec![10]);

        assert_eq!(store.count_attempts("p1").unwrap(), 3);
        assert_eq!(store.clear_attempts("p1").unwrap(), 3);
        assert!(store.list_attempts("p1", 10, 0).unwrap().is_empty());
        assert_eq!(store.count_attempts("p2").unwrap(), 1);
    }
}
