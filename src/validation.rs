//! Input checks shared by extractors and routes.

use crate::constants::{DEFAULT_HISTORY_PAGE_SIZE, MAX_HISTORY_PAGE_SIZE, MAX_PLAYER_ID_LEN};

/// Player ids are 1 to 64 characters of ASCII letters, digits, `-` or `_`.
pub fn is_valid_player_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_PLAYER_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Clamps a requested history page size into `1..=MAX_HISTORY_PAGE_SIZE`.
pub fn clamp_page_size(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_HISTORY_PAGE_SIZE)
        .clamp(1, MAX_HISTORY_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_charset_and_length() {
        assert!(is_valid_player_id("alice_01-b"));
        assert!(!is_valid_player_id(""));
        assert!(!is_valid_player_id("has space"));
        assert!(!is_valid_player_id("slash/inside"));
        assert!(is_valid_player_id(&"x".repeat(64)));
        assert!(!is_valid_player_id(&"x".repeat(65)));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(clamp_page_size(None), 20);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(500)), 100);
        assert_eq!(clamp_page_size(Some(35)), 35);
    }
}
