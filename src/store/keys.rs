pub fn player_key(player_id: &str) -> String {
    player_id.to_string()
}

pub fn player_settings_key(player_id: &str) -> String {
    player_id.to_string()
}

/// Newest attempts sort first under a player's prefix. `seq` breaks ties
/// between attempts recorded in the same millisecond.
pub fn attempt_key(player_id: &str, timestamp_ms: i64, seq: u64) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    let reverse_seq = u64::MAX - seq;
    format!("{}:{:020}:{:020}", player_id, reverse_ts, reverse_seq)
}

pub fn attempt_prefix(player_id: &str) -> String {
    format!("{}:", player_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_keys_sort_newest_first() {
        let older = attempt_key("p1", 1_000, 5);
        let newer = attempt_key("p1", 2_000, 1);
        assert!(newer < older);
        assert!(older.starts_with(&attempt_prefix("p1")));
    }

    #[test]
    fn same_millisecond_attempts_order_by_sequence() {
        let first = attempt_key("p1", 1_000, 1);
        let second = attempt_key("p1", 1_000, 2);
        assert!(second < first);
    }

    #[test]
    fn attempt_prefix_does_not_match_longer_ids() {
        let other = attempt_key("p10", 1_000, 0);
        assert!(!other.starts_with(&attempt_prefix("p1")));
    }
}
