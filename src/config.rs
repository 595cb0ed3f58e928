//! Game configuration.
//!
//! Settings can come from a TOML file; any field left out falls back to the
//! default. The CLI applies its flags on top of whatever was loaded.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::game::Difficulty;

/// Upper bound on the scripted-turn delay.
const MAX_SCRIPTED_DELAY_MS: u64 = 60_000;

/// Settings for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Map width in tiles.
    pub width: u16,
    /// Map height in tiles.
    pub height: u16,
    /// Seed for map generation. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Whether agent 0 takes moves from user input.
    pub human_seat: bool,
    /// Pause before each scripted turn, in milliseconds.
    pub scripted_delay_ms: u64,
    /// Temperament of every scripted agent.
    pub difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            seed: None,
            human_seat: true,
            scripted_delay_ms: 500,
            difficulty: Difficulty::Insane,
        }
    }
}

impl GameConfig {
    /// Load a config from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting config is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Check that the config describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or an out-of-range delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.scripted_delay_ms > MAX_SCRIPTED_DELAY_MS {
            return Err(ConfigError::InvalidDelay(self.scripted_delay_ms));
        }
        Ok(())
    }

    /// The pause before each scripted turn.
    #[must_use]
    pub const fn scripted_delay(&self) -> Duration {
        Duration::from_millis(self.scripted_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (100, 100));
        assert!(config.human_seat);
        assert_eq!(config.scripted_delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 40\nseed = 7\ndifficulty = \"easy\"").unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 100);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_load_rejects_zero_width() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 0").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::InvalidDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = \"wide\"").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = GameConfig::load(Path::new("/nonexistent/gridwar.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_delay_limit() {
        let config = GameConfig {
            scripted_delay_ms: 120_000,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDelay(120_000))));
    }
}
