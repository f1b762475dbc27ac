use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "filmections";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub(crate) version: u32,

    /// Films requested from the metadata source per generation attempt.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Below this many films, recently used films are not filtered out.
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: usize,

    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: usize,

    #[serde(default = "default_recent_games_limit")]
    pub recent_games_limit: usize,

    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,

    #[serde(default = "default_shake_duration_ms")]
    pub shake_duration_ms: u64,

    #[serde(default)]
    pub test_mode: bool,
}

fn default_version() -> u32 {
    2
}
fn default_pool_size() -> usize {
    150
}
fn default_min_pool_size() -> usize {
    100
}
fn default_max_generation_attempts() -> usize {
    50
}
fn default_recent_games_limit() -> usize {
    5
}
fn default_notification_duration_ms() -> u64 {
    2000
}
fn default_shake_duration_ms() -> u64 {
    500
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            pool_size: default_pool_size(),
            min_pool_size: default_min_pool_size(),
            max_generation_attempts: default_max_generation_attempts(),
            recent_games_limit: default_recent_games_limit(),
            notification_duration_ms: default_notification_duration_ms(),
            shake_duration_ms: default_shake_duration_ms(),
            test_mode: false,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(Self::settings_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(mut settings) = serde_json::from_str::<Settings>(&contents) {
                settings.migrate();
                return settings;
            }
            warn!(target: "settings", "Ignoring unreadable settings at {:?}", path);
        }
        let default = Settings::default();
        if let Err(e) = default.save_to(&path) {
            warn!(target: "settings", "Failed to write default settings: {}", e);
        }
        default
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::settings_path())
    }

    fn save_to(&self, path: &PathBuf) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    fn settings_path() -> PathBuf {
        Self::data_dir().join("settings.json")
    }

    /// Where settings, stats, puzzles and the recent-content cache live.
    pub fn data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("FILMECTIONS_DATA_DIR") {
            return PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(dir).join(APP_DIR);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local/share").join(APP_DIR);
        }
        PathBuf::from(".").join(format!(".{}", APP_DIR))
    }

    fn migrate(&mut self) {
        match self.version {
            // v1 had no generation limit and retried forever
            0 | 1 => {
                self.max_generation_attempts = default_max_generation_attempts();
                self.version = 2;
            }
            _ => (),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    pub fn shake_duration(&self) -> Duration {
        Duration::from_millis(self.shake_duration_ms)
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"pool_size": 80}"#).unwrap();
        assert_eq!(settings.pool_size, 80);
        assert_eq!(settings.min_pool_size, 100);
        assert_eq!(settings.notification_duration(), Duration::from_secs(2));
        assert_eq!(settings.shake_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings::load_from(path.clone());
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_old_version_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"version": 1, "max_generation_attempts": 0}"#).unwrap();

        let settings = Settings::load_from(path);
        assert_eq!(settings.version, 2);
        assert_eq!(settings.max_generation_attempts, 50);
    }

    #[test]
    #[serial]
    fn test_seed_and_data_dir_from_env() {
        std::env::set_var("SEED", "42");
        std::env::set_var("FILMECTIONS_DATA_DIR", "/tmp/filmections-test");
        assert_eq!(Settings::seed_from_env(), Some(42));
        assert_eq!(Settings::data_dir(), PathBuf::from("/tmp/filmections-test"));

        std::env::set_var("SEED", "not-a-number");
        assert_eq!(Settings::seed_from_env(), None);

        std::env::remove_var("SEED");
        std::env::remove_var("FILMECTIONS_DATA_DIR");
    }
}
