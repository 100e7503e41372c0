use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chajda_log;

pub static ENV_VAR_LOWER_CASE: &str = "CHAJDA_LOWER_CASE";
pub static ENV_VAR_REMOVE_SPECIAL_CHARS: &str = "CHAJDA_REMOVE_SPECIAL_CHARS";
pub static ENV_VAR_REMOVE_STOP_WORDS: &str = "CHAJDA_REMOVE_STOP_WORDS";
pub static ENV_VAR_MAX_LEMMA_SIZE: &str = "CHAJDA_MAX_LEMMA_SIZE";

pub const DEFAULT_LOWER_CASE: bool = true;
pub const DEFAULT_REMOVE_SPECIAL_CHARS: bool = true;
pub const DEFAULT_REMOVE_STOP_WORDS: bool = true;
pub const DEFAULT_MAX_LEMMA_SIZE: usize = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Normalization options shared by query compilation and document indexing.
///
/// A `tsquery` only matches a `tsvector` built with the same language and the
/// same options, so callers must use one `Config` for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lower_case: bool,
    pub remove_special_chars: bool,
    pub remove_stop_words: bool,
    /// Lemmas longer than this many characters are truncated
    pub max_lemma_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lower_case: DEFAULT_LOWER_CASE,
            remove_special_chars: DEFAULT_REMOVE_SPECIAL_CHARS,
            remove_stop_words: DEFAULT_REMOVE_STOP_WORDS,
            max_lemma_size: DEFAULT_MAX_LEMMA_SIZE,
        }
    }
}

impl Config {
    /// Build a config from `CHAJDA_*` environment variables, using the default
    /// for every variable that is unset or unparsable.
    pub fn from_env() -> Config {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_json_str(json: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            lower_case: read_var(&lookup, ENV_VAR_LOWER_CASE, DEFAULT_LOWER_CASE),
            remove_special_chars: read_var(
                &lookup,
                ENV_VAR_REMOVE_SPECIAL_CHARS,
                DEFAULT_REMOVE_SPECIAL_CHARS,
            ),
            remove_stop_words: read_var(&lookup, ENV_VAR_REMOVE_STOP_WORDS, DEFAULT_REMOVE_STOP_WORDS),
            max_lemma_size: read_var(&lookup, ENV_VAR_MAX_LEMMA_SIZE, DEFAULT_MAX_LEMMA_SIZE),
        }
    }
}

fn read_var<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            chajda_log!(
                warn,
                "Config",
                "-",
                "Ignoring invalid value {:?} for {}, using {}",
                raw,
                name,
                default
            );
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.lower_case);
        assert!(config.remove_special_chars);
        assert!(config.remove_stop_words);
        assert_eq!(config.max_lemma_size, 20);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_VAR_LOWER_CASE, "false"),
            (ENV_VAR_MAX_LEMMA_SIZE, " 5 "),
            (ENV_VAR_REMOVE_STOP_WORDS, "not-a-bool"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(
            config,
            Config {
                lower_case: false,
                remove_special_chars: true,
                remove_stop_words: true,
                max_lemma_size: 5,
            }
        );
    }

    #[test]
    fn test_config_from_json_uses_defaults_for_missing_fields() {
        let config = Config::from_json_str(r#"{"remove_stop_words": false}"#).unwrap();
        assert_eq!(
            config,
            Config {
                remove_stop_words: false,
                ..Config::default()
            }
        );
    }

    #[test]
    fn test_config_from_invalid_json() {
        assert!(matches!(
            Config::from_json_str(r#"{"max_lemma_size": "big"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
