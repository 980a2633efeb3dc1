use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{DEFAULT_INITIAL_RATING, DEFAULT_RATING_FLOOR};
use crate::logging::LogConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub corpus_path: String,
    pub cors_origin: String,
    pub trainer: TrainerEnvConfig,
}

#[derive(Debug, Clone)]
pub struct TrainerEnvConfig {
    pub initial_rating: i32,
    pub rating_floor: i32,
    /// Fixed seed for reproducible puzzle selection; entropy when unset.
    pub selector_seed: Option<u64>,
}

impl Default for TrainerEnvConfig {
    fn default() -> Self {
        Self {
            initial_rating: DEFAULT_INITIAL_RATING,
            rating_floor: DEFAULT_RATING_FLOOR,
            selector_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/trainer.sled"),
            corpus_path: env_or("CORPUS_PATH", "./data/puzzles.json"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            trainer: TrainerEnvConfig {
                initial_rating: env_or_parse("TRAINER_INITIAL_RATING", DEFAULT_INITIAL_RATING),
                rating_floor: env_or_parse("TRAINER_RATING_FLOOR", DEFAULT_RATING_FLOOR),
                selector_seed: env_opt_parse("TRAINER_SELECTOR_SEED"),
            },
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            enable_file_logs: self.enable_file_logs,
            log_dir: self.log_dir.clone(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Like [`env_or_parse`] for settings with no default; blank reads as unset.
pub fn env_opt_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Failed to parse env var, ignoring it");
            None
        }
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "HOST",
            "PORT",
            "RUST_LOG",
            "ENABLE_FILE_LOGS",
            "CORPUS_PATH",
            "TRAINER_INITIAL_RATING",
            "TRAINER_RATING_FLOOR",
            "TRAINER_SELECTOR_SEED",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.corpus_path, "./data/puzzles.json");
        assert_eq!(cfg.trainer.initial_rating, 1200);
        assert_eq!(cfg.trainer.rating_floor, 100);
        assert!(cfg.trainer.selector_seed.is_none());
    }

    #[test]
    fn parses_numeric_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "4000");
        env::set_var("TRAINER_INITIAL_RATING", "1000");
        env::set_var("TRAINER_SELECTOR_SEED", "12345");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.trainer.initial_rating, 1000);
        assert_eq!(cfg.trainer.selector_seed, Some(12345));
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "bad");
        env::set_var("TRAINER_RATING_FLOOR", "x");
        env::set_var("TRAINER_SELECTOR_SEED", "-3");
        env::set_var("ENABLE_FILE_LOGS", "maybe");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.trainer.rating_floor, 100);
        assert!(cfg.trainer.selector_seed.is_none());
        assert!(!cfg.enable_file_logs);
        clear_keys(managed_keys());
    }
}
