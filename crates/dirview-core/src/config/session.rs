//! Session lifetime configuration.

use serde::{Deserialize, Serialize};

/// Session lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes of inactivity after which a session expires.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_minutes: u64,
    /// Absolute session lifetime in hours, regardless of activity.
    #[serde(default = "default_max_session")]
    pub max_session_hours: u64,
    /// Interval between expired-session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_minutes: default_inactivity_timeout(),
            max_session_hours: default_max_session(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_inactivity_timeout() -> u64 {
    10
}

fn default_max_session() -> u64 {
    8
}

fn default_cleanup_interval() -> u64 {
    60
}
