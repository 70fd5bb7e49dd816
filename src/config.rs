use crate::core::types::DEFAULT_SCORE;
use crate::logging::LogConfig;
use crate::persistence::Format;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub autosave_path: PathBuf,
    pub autosave_format: Format,
    pub default_score: f64,
    pub list_limit: usize,
    pub history_limit: usize,
    pub seed_vocabulary: bool,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_path: PathBuf::from("autosave_translator.json"),
            autosave_format: Format::Json,
            default_score: DEFAULT_SCORE,
            list_limit: 10,
            history_limit: 50,
            seed_vocabulary: true,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let log_level = env_or("RUST_LOG", &defaults.log.log_level);
        Self {
            autosave_path: env::var("TRANSLATOR_AUTOSAVE")
                .map(PathBuf::from)
                .unwrap_or(defaults.autosave_path),
            autosave_format: env_or_parse("TRANSLATOR_AUTOSAVE_FORMAT", defaults.autosave_format),
            default_score: env_or_parse("TRANSLATOR_DEFAULT_SCORE", defaults.default_score),
            list_limit: env_or_parse("TRANSLATOR_LIST_LIMIT", defaults.list_limit),
            history_limit: env_or_parse("TRANSLATOR_HISTORY_LIMIT", defaults.history_limit),
            seed_vocabulary: env_or_bool("TRANSLATOR_SEED", defaults.seed_vocabulary),
            log: LogConfig {
                log_level,
                ..defaults.log
            },
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
                tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
                default
            }
        },
        Err(_) => default,
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
