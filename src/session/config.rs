//! Session configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Delay before a turn window opens, letting clients sync.
pub const MIN_TURN_DURATION: Duration = Duration::from_millis(500);
/// Longest a turn window stays open before it resolves anyway.
pub const TURN_TIMEOUT: Duration = Duration::from_secs(2);
/// How long a session may wait for its players before it is torn down.
pub const GAME_START_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// How long a finished session stays in the registry for late readers.
pub const FINISHED_SESSION_RETENTION: Duration = Duration::from_secs(10 * 60);

/// Timing and persistence settings shared by every session of a manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between a turn transition and the window opening
    pub min_turn_duration: Duration,
    /// Deadline after which an open window resolves with what it has
    pub turn_timeout: Duration,
    /// Idle teardown for sessions that never fill up
    pub start_timeout: Duration,
    /// Eviction delay for finished sessions
    pub finished_retention: Duration,
    /// Where finished games are written; nothing is written when unset
    pub history_dir: Option<PathBuf>,
    /// Seed for the resolution shuffle; entropy when unset
    pub seed: Option<u64>,
    /// Skips the minimum turn duration
    pub dev_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_turn_duration: MIN_TURN_DURATION,
            turn_timeout: TURN_TIMEOUT,
            start_timeout: GAME_START_TIMEOUT,
            finished_retention: FINISHED_SESSION_RETENTION,
            history_dir: None,
            seed: None,
            dev_mode: false,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `APIARY_HISTORY_DIR`, `APIARY_SEED` and
    /// `APIARY_DEV_MODE`. Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var("APIARY_HISTORY_DIR").filter(|d| !d.is_empty()) {
            self.history_dir = Some(PathBuf::from(dir));
        }
        if let Some(seed) = var("APIARY_SEED") {
            match seed.parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => warn!(value = %seed, "ignoring invalid APIARY_SEED"),
            }
        }
        if let Some(flag) = var("APIARY_DEV_MODE") {
            self.dev_mode = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// The delay applied before each window opens.
    pub fn window_delay(&self) -> Duration {
        if self.dev_mode {
            Duration::ZERO
        } else {
            self.min_turn_duration
        }
    }
}
