use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::persist::default_data_dir;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub futsal_minutes: u32,
    pub tick: Duration,
    pub ephemeral: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            futsal_minutes: 10,
            tick: Duration::from_millis(100),
            ephemeral: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_dir = env::var("SCOREBOARD_DATA_DIR")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .or(defaults.data_dir);
        let futsal_minutes = env::var("SCOREBOARD_FUTSAL_MINUTES")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(defaults.futsal_minutes)
            .clamp(1, 24 * 60);
        let tick_ms = env::var("SCOREBOARD_TICK_MS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(100)
            .clamp(20, 1000);
        let ephemeral = env::var("SCOREBOARD_EPHEMERAL")
            .map(|val| matches!(val.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let log_filter = env::var("SCOREBOARD_LOG")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Self {
            data_dir,
            futsal_minutes,
            tick: Duration::from_millis(tick_ms),
            ephemeral,
            log_filter,
        }
    }

    pub fn period_secs(&self) -> u32 {
        self.futsal_minutes * 60
    }
}
