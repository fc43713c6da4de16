use score_core::{
    DEFAULT_CELEBRATION_DURATION, DEFAULT_PULSE_DURATION, DEFAULT_RESORT_DELAY, SessionConfig,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime knobs, all read from the environment. Invalid values fall
/// back to the defaults rather than aborting a full-screen app.
#[derive(Debug, Clone)]
pub struct Config {
    pub resort_delay: Duration,
    pub pulse_duration: Duration,
    pub celebration_duration: Duration,
    pub tick_rate: Duration,
    pub snapshot_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            resort_delay: millis_var("SCORE_RESORT_DELAY_MS", DEFAULT_RESORT_DELAY),
            pulse_duration: millis_var("SCORE_PULSE_MS", DEFAULT_PULSE_DURATION),
            celebration_duration: millis_var("SCORE_CELEBRATION_MS", DEFAULT_CELEBRATION_DURATION),
            tick_rate: millis_var("SCORE_TICK_MS", Duration::from_millis(100)),
            snapshot_path: path_var("SCORE_SNAPSHOT"),
            log_file: path_var("SCORE_LOG"),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            resort_delay: self.resort_delay,
            pulse_duration: self.pulse_duration,
            celebration_duration: self.celebration_duration,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn millis_var(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .map(PathBuf::from)
}
