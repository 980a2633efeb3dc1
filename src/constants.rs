/// Rating assigned to a player with no saved state.
pub const DEFAULT_INITIAL_RATING: i32 = 1200;

/// Player ratings never drop below this after an answer.
pub const DEFAULT_RATING_FLOOR: i32 = 100;

/// Accepted range for an item's difficulty rating at ingestion.
pub const MIN_ITEM_DIFFICULTY: i32 = 100;
pub const MAX_ITEM_DIFFICULTY: i32 = 3000;

/// Attempt history page sizes
pub const DEFAULT_HISTORY_PAGE_SIZE: usize = 20;
pub const MAX_HISTORY_PAGE_SIZE: usize = 100;

/// Upper bound for the `x-player-id` header value.
pub const MAX_PLAYER_ID_LEN: usize = 64;

/// Idle per-player locks are pruned once the map grows past this size.
pub const PLAYER_LOCK_PRUNE_THRESHOLD: usize = 1000;
