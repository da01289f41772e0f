//! chairgame configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::GameError;

/// Main chairgame configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Game setup and round timing
    pub game: GameConfig,
}

/// Project-local config file, looked up in the working directory
const LOCAL_CONFIG: &str = ".chairgame.yml";

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise the first default location that
    /// exists and parses wins, and defaults apply when none does.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in default_paths().iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!("Skipping config {}: {:#}", path.display(), e),
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Walks the same locations as [`Config::load`]. Any failure yields None;
    /// the full load later reports it properly.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => default_paths(),
        };
        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        debug!(path = %path.as_ref().display(), "Config::load_from_file: loaded");
        Ok(config)
    }
}

/// Config files tried when no path is given, in priority order:
/// `./.chairgame.yml`, then `<config_dir>/chairgame/chairgame.yml`
fn default_paths() -> Vec<PathBuf> {
    let user_config = dirs::config_dir().map(|dir| dir.join("chairgame").join("chairgame.yml"));
    std::iter::once(PathBuf::from(LOCAL_CONFIG)).chain(user_config).collect()
}

/// Game setup and round timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of participants (at least 2)
    pub players: usize,

    /// Shortest time the music plays before stopping, in milliseconds
    #[serde(rename = "stop-min-ms")]
    pub stop_min_ms: u64,

    /// Longest time the music plays before stopping, in milliseconds
    #[serde(rename = "stop-max-ms")]
    pub stop_max_ms: u64,

    /// Extra pause after every racer has finished, in milliseconds
    #[serde(rename = "grace-ms")]
    pub grace_ms: u64,

    /// Seed for the stop-time generator; random when unset
    pub seed: Option<u64>,

    /// Print progress lines to stdout
    pub echo: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        debug!("GameConfig::default: called");
        Self {
            players: crate::DEFAULT_PLAYERS,
            stop_min_ms: 1000,
            stop_max_ms: 3000,
            grace_ms: 0,
            seed: None,
            echo: true,
        }
    }
}

impl GameConfig {
    /// Check the setup before any thread is spawned
    pub fn validate(&self) -> Result<(), GameError> {
        if self.players < 2 {
            return Err(GameError::InvalidPlayerCount { count: self.players });
        }
        if self.stop_min_ms > self.stop_max_ms {
            return Err(GameError::InvalidStopInterval {
                min_ms: self.stop_min_ms,
                max_ms: self.stop_max_ms,
            });
        }
        Ok(())
    }

    pub fn stop_min(&self) -> Duration {
        Duration::from_millis(self.stop_min_ms)
    }

    pub fn stop_max(&self) -> Duration {
        Duration::from_millis(self.stop_max_ms)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.players, 4);
        assert_eq!(config.stop_min_ms, 1000);
        assert_eq!(config.stop_max_ms, 3000);
        assert_eq!(config.grace_ms, 0);
        assert_eq!(config.seed, None);
        assert!(config.echo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_setup() {
        let config = GameConfig {
            players: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidPlayerCount { count: 1 })
        ));

        let config = GameConfig {
            stop_min_ms: 50,
            stop_max_ms: 10,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidStopInterval { min_ms: 50, max_ms: 10 })
        ));
    }

    #[test]
    fn test_durations() {
        let config = GameConfig {
            stop_min_ms: 5,
            stop_max_ms: 20,
            grace_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.stop_min(), Duration::from_millis(5));
        assert_eq!(config.stop_max(), Duration::from_millis(20));
        assert_eq!(config.grace(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "log-level: debug\ngame:\n  players: 6\n  stop-min-ms: 10\n  stop-max-ms: 20\n  seed: 42"
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.game.players, 6);
        assert_eq!(config.game.stop_min_ms, 10);
        assert_eq!(config.game.stop_max_ms, 20);
        assert_eq!(config.game.seed, Some(42));
        // Unset keys keep their defaults
        assert_eq!(config.game.grace_ms, 0);
        assert!(config.game.echo);

        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("debug"));
    }

    #[test]
    fn test_default_paths_local_first() {
        let paths = default_paths();
        assert_eq!(paths[0], PathBuf::from(".chairgame.yml"));
        if let Some(config_dir) = dirs::config_dir() {
            assert_eq!(paths[1], config_dir.join("chairgame").join("chairgame.yml"));
        }
    }

    #[test]
    fn test_log_level_unparsable_file_is_none() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "game: [not, a, map").unwrap();

        let path = file.path().to_path_buf();
        assert_eq!(Config::load_log_level(Some(&path)), None);
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/chairgame.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert_eq!(Config::load_log_level(Some(&path)), None);
    }
}
