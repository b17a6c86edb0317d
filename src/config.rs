//! Configuration resolved from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `SCORES_BIND_ADDR` | `127.0.0.1:5000` |
//! | `SCORES_DATA_FILE` | `game_scores.json` (relative to the current directory) |
//! | `SCORES_STORAGE` | `json_file` (or `memory`) |
//! | `SCORES_HISTORY_CAPACITY` | `50` |
//! | `SCORES_MAX_QUERY_LIMIT` | `100` |
//! | `SCORES_LEADERBOARD_SIZE` | `10` |
//! | `SCORES_SUMMARY_SOURCE` | `event_log` (or `retained_history`) |
//! | `SCORES_DEFAULT_PLAYER` | `guest` |
//! | `SCORES_DEFAULT_GAME_TYPE` | `slot` |

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::event_store::MAX_QUERY_LIMIT;
use crate::ledger::DEFAULT_HISTORY_CAPACITY;
use crate::types::SummarySource;

/// Invalid configuration value
#[derive(Debug, Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Where the ledger state is kept between mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// JSON document on disk
    #[default]
    JsonFile,
    /// Nothing survives a restart
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json_file" | "json" => Ok(StorageKind::JsonFile),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage '{}' (expected json_file or memory)", other)),
        }
    }
}

/// Domain knobs of the score service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the JSON document
    pub data_file: PathBuf,
    pub storage: StorageKind,
    /// Recent scores kept per player
    pub history_capacity: usize,
    /// Upper bound for `limit` query parameters
    pub max_query_limit: usize,
    /// `limit` when a history query gives none
    pub default_limit: usize,
    /// Leaderboard length when the request gives none
    pub leaderboard_size: usize,
    pub summary_source: SummarySource,
    /// Player id used when a request omits it
    pub default_player_id: String,
    /// Game type used when a submission omits it
    pub default_game_type: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("game_scores.json"),
            storage: StorageKind::JsonFile,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_query_limit: 100,
            default_limit: 10,
            leaderboard_size: 10,
            summary_source: SummarySource::EventLog,
            default_player_id: "guest".to_string(),
            default_game_type: "slot".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Default config writing to `data_file`
    pub fn with_data_file<P: AsRef<Path>>(data_file: P) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// In-memory config, nothing touches the disk
    pub fn in_memory() -> Self {
        Self {
            storage: StorageKind::Memory,
            ..Default::default()
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_summary_source(mut self, source: SummarySource) -> Self {
        self.summary_source = source;
        self
    }
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub service: ServiceConfig,
}

impl ServerConfig {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();

        let bind_addr = parse_var(&lookup, "SCORES_BIND_ADDR", || {
            SocketAddr::from(([127, 0, 0, 1], 5000))
        })?;

        let data_file = match lookup("SCORES_DATA_FILE").filter(|v| !v.trim().is_empty()) {
            Some(path) => resolve_path(&path),
            None => resolve_path(&defaults.data_file.to_string_lossy()),
        };

        let history_capacity =
            parse_var(&lookup, "SCORES_HISTORY_CAPACITY", || defaults.history_capacity)?;
        if history_capacity == 0 {
            return Err(invalid("SCORES_HISTORY_CAPACITY", "0", "must be at least 1"));
        }

        let max_query_limit =
            parse_var(&lookup, "SCORES_MAX_QUERY_LIMIT", || defaults.max_query_limit)?;
        if max_query_limit == 0 || max_query_limit > MAX_QUERY_LIMIT {
            return Err(invalid(
                "SCORES_MAX_QUERY_LIMIT",
                &max_query_limit.to_string(),
                &format!("must be between 1 and {}", MAX_QUERY_LIMIT),
            ));
        }

        let leaderboard_size =
            parse_var(&lookup, "SCORES_LEADERBOARD_SIZE", || defaults.leaderboard_size)?;
        let summary_source =
            parse_var(&lookup, "SCORES_SUMMARY_SOURCE", || defaults.summary_source)?;
        let storage = parse_var(&lookup, "SCORES_STORAGE", || defaults.storage)?;

        let default_player_id = non_blank(&lookup, "SCORES_DEFAULT_PLAYER")
            .unwrap_or(defaults.default_player_id);
        let default_game_type = non_blank(&lookup, "SCORES_DEFAULT_GAME_TYPE")
            .unwrap_or(defaults.default_game_type);

        Ok(Self {
            bind_addr,
            service: ServiceConfig {
                data_file,
                storage,
                history_capacity,
                max_query_limit,
                default_limit: defaults.default_limit.min(max_query_limit),
                leaderboard_size: leaderboard_size.clamp(1, max_query_limit),
                summary_source,
                default_player_id,
                default_game_type,
            },
        })
    }
}

fn parse_var<T, F, D>(lookup: &F, var: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match lookup(var).filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &value, &e.to_string())),
        None => Ok(default()),
    }
}

fn non_blank<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Absolute paths are kept, relative ones resolve against the current directory
fn resolve_path(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert!(config.service.data_file.is_absolute());
        assert!(config.service.data_file.ends_with("game_scores.json"));
        assert_eq!(config.service.history_capacity, 50);
        assert_eq!(config.service.max_query_limit, 100);
        assert_eq!(config.service.summary_source, SummarySource::EventLog);
        assert_eq!(config.service.storage, StorageKind::JsonFile);
        assert_eq!(config.service.default_player_id, "guest");
        assert_eq!(config.service.default_game_type, "slot");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("SCORES_BIND_ADDR", "0.0.0.0:8080"),
            ("SCORES_DATA_FILE", "/var/lib/scores/plinko_scores.json"),
            ("SCORES_HISTORY_CAPACITY", "20"),
            ("SCORES_SUMMARY_SOURCE", "retained_history"),
            ("SCORES_STORAGE", "memory"),
            ("SCORES_DEFAULT_PLAYER", "invite"),
            ("SCORES_DEFAULT_GAME_TYPE", "plinko"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(
            config.service.data_file,
            PathBuf::from("/var/lib/scores/plinko_scores.json")
        );
        assert_eq!(config.service.history_capacity, 20);
        assert_eq!(config.service.summary_source, SummarySource::RetainedHistory);
        assert_eq!(config.service.storage, StorageKind::Memory);
        assert_eq!(config.service.default_player_id, "invite");
        assert_eq!(config.service.default_game_type, "plinko");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup_from(&[("SCORES_HISTORY_CAPACITY", "lots")]))
            .unwrap_err();
        assert_eq!(err.var, "SCORES_HISTORY_CAPACITY");

        assert!(ServerConfig::from_lookup(lookup_from(&[("SCORES_HISTORY_CAPACITY", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("SCORES_MAX_QUERY_LIMIT", "5000")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("SCORES_SUMMARY_SOURCE", "buffer")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("SCORES_BIND_ADDR", "nowhere")])).is_err());
    }
}
