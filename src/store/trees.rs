pub const PLAYERS: &str = "players";
pub const PLAYER_SETTINGS: &str = "player_settings";
pub const ATTEMPTS: &str = "attempts";
pub const META: &str = "meta";
