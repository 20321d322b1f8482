//! Configuration loading for Grain.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.grain/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! The config file is written on first run and by `grain goal`. It is kept
//! apart from `data.json` and never travels with backups.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GrainError, Result};

/// Default target study credits per week.
pub const DEFAULT_WEEKLY_GOAL: u32 = 90;

/// Default break credits granted at the start of each week.
pub const DEFAULT_BREAK_START: u32 = 12;

/// File names inside the Grain home directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_FILE_NAME: &str = "data.json";
pub const BACKUPS_DIR_NAME: &str = "backups";
pub const CRASH_LOG_NAME: &str = "crash.log";

/// User settings for the weekly credit cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Target study credits per week.
    pub weekly_goal: u32,
    /// Break credits available at the start of each week.
    pub break_start: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            break_start: DEFAULT_BREAK_START,
        }
    }
}

impl Config {
    /// Create a config with explicit values.
    pub fn new(weekly_goal: u32, break_start: u32) -> Self {
        Self {
            weekly_goal,
            break_start,
        }
    }

    /// Check if a weekly goal value is valid (must be positive).
    pub fn is_valid_weekly_goal(value: u32) -> bool {
        value > 0
    }

    /// Load configuration with full precedence chain.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read
    /// or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a specific file path, without env overrides.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GrainError::storage(path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| GrainError::config(format!("{}: {}", path.display(), e)))?;
        Ok(config.sanitized())
    }

    /// Write the config as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| GrainError::serde(e.to_string()))?;
        fs::write(path, content).map_err(|e| GrainError::storage(path, e))
    }

    /// Replace invalid values with defaults.
    fn sanitized(mut self) -> Self {
        if !Self::is_valid_weekly_goal(self.weekly_goal) {
            tracing::warn!(
                weekly_goal = self.weekly_goal,
                "weekly goal must be positive, using default {}",
                DEFAULT_WEEKLY_GOAL
            );
            self.weekly_goal = DEFAULT_WEEKLY_GOAL;
        }
        self
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // GRAIN_WEEKLY_GOAL
        if let Ok(val) = env::var("GRAIN_WEEKLY_GOAL") {
            match val.parse::<u32>() {
                Ok(n) if Self::is_valid_weekly_goal(n) => self.weekly_goal = n,
                _ => tracing::warn!(
                    "Invalid GRAIN_WEEKLY_GOAL value '{}'. Expected a positive integer. \
                    Using '{}'.",
                    val,
                    self.weekly_goal
                ),
            }
        }

        // GRAIN_BREAK_START
        if let Ok(val) = env::var("GRAIN_BREAK_START") {
            match val.parse::<u32>() {
                Ok(n) => self.break_start = n,
                Err(_) => tracing::warn!(
                    "Invalid GRAIN_BREAK_START value '{}'. Expected a non-negative integer. \
                    Using '{}'.",
                    val,
                    self.break_start
                ),
            }
        }
    }
}

/// Get the Grain home directory.
///
/// Checks `GRAIN_HOME` environment variable first, then falls back to
/// `~/.grain`. An empty `GRAIN_HOME` is ignored.
pub fn grain_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("GRAIN_HOME") {
        if home.is_empty() {
            tracing::warn!("GRAIN_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("GRAIN_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".grain"));
    }

    // Containerized/minimal environments without HOME
    let fallback_path = env::temp_dir().join("grain");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Create the home directory and its `backups/` subdirectory if missing.
pub fn ensure_home(home: &Path) -> Result<()> {
    let backups = home.join(BACKUPS_DIR_NAME);
    fs::create_dir_all(&backups).map_err(|e| GrainError::storage(&backups, e))
}

/// Path of `config.toml` inside `home`.
pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE_NAME)
}

/// Path of `data.json` inside `home`.
pub fn data_path(home: &Path) -> PathBuf {
    home.join(DATA_FILE_NAME)
}

/// Path of the backups directory inside `home`.
pub fn backups_dir(home: &Path) -> PathBuf {
    home.join(BACKUPS_DIR_NAME)
}

/// Path of the crash log inside `home`.
pub fn crash_log_path(home: &Path) -> PathBuf {
    home.join(CRASH_LOG_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        env::remove_var("GRAIN_WEEKLY_GOAL");
        env::remove_var("GRAIN_BREAK_START");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.weekly_goal, 90);
        assert_eq!(config.break_start, 12);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let config = Config::load(&config_path(dir.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_load_from_toml() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        fs::write(&path, "weekly_goal = 60\nbreak_start = 8\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::new(60, 8));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        fs::write(&path, "break_start = 5\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.weekly_goal, DEFAULT_WEEKLY_GOAL);
        assert_eq!(config.break_start, 5);
    }

    #[test]
    fn test_zero_goal_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        fs::write(&path, "weekly_goal = 0\nbreak_start = 3\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.weekly_goal, DEFAULT_WEEKLY_GOAL);
        assert_eq!(config.break_start, 3);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        fs::write(&path, "weekly_goal = \"lots\"").unwrap();

        let result = Config::load_from_file(&path);
        assert!(matches!(result, Err(GrainError::Config { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        Config::new(120, 20).save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("weekly_goal = 120"));
        assert_eq!(Config::load_from_file(&path).unwrap(), Config::new(120, 20));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("GRAIN_WEEKLY_GOAL", "45");
        env::set_var("GRAIN_BREAK_START", "0");

        let dir = TempDir::new().unwrap();
        let config = Config::load(&config_path(dir.path())).unwrap();
        assert_eq!(config, Config::new(45, 0));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_overrides_are_ignored() {
        clear_env();
        env::set_var("GRAIN_WEEKLY_GOAL", "0");
        env::set_var("GRAIN_BREAK_START", "-4");

        let dir = TempDir::new().unwrap();
        let config = Config::load(&config_path(dir.path())).unwrap();
        assert_eq!(config, Config::default());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_grain_home_with_env() {
        let dir = TempDir::new().unwrap();
        env::set_var("GRAIN_HOME", dir.path().to_str().unwrap());

        assert_eq!(grain_home().unwrap(), dir.path());

        env::remove_var("GRAIN_HOME");
    }

    #[test]
    #[serial]
    fn test_grain_home_fallback() {
        env::remove_var("GRAIN_HOME");

        let home = grain_home();
        assert!(home.is_some());
        assert!(home.unwrap().ends_with(".grain") || env::var("HOME").is_err());
    }

    #[test]
    fn test_ensure_home_creates_backups_dir() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("grain");

        ensure_home(&home).unwrap();
        assert!(backups_dir(&home).is_dir());

        // Idempotent
        ensure_home(&home).unwrap();
    }

    #[test]
    fn test_paths() {
        let home = Path::new("/tmp/grain-home");
        assert!(config_path(home).ends_with("config.toml"));
        assert!(data_path(home).ends_with("data.json"));
        assert!(backups_dir(home).ends_with("backups"));
        assert!(crash_log_path(home).ends_with("crash.log"));
    }
}
