//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// User registry and login configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Pre-provisioned users. When empty, the built-in demo registry is used.
    #[serde(default)]
    pub users: Vec<UserEntry>,
    /// Per-username login throttling.
    #[serde(default)]
    pub login_throttle: LoginThrottleConfig,
}

/// A provisioned user as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// Unique username.
    pub username: String,
    /// Encoded password hash, `base64(salt):base64(hash)`.
    /// Produce one with `dirview-server hash-password`.
    pub password_hash: String,
}

/// Token bucket settings for login attempts, keyed by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginThrottleConfig {
    /// Whether login attempts are throttled.
    #[serde(default)]
    pub enabled: bool,
    /// Attempts allowed in a burst.
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Attempts regained per second.
    #[serde(default = "default_refill")]
    pub refill_per_second: f64,
}

impl Default for LoginThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            burst: default_burst(),
            refill_per_second: default_refill(),
        }
    }
}

fn default_burst() -> u32 {
    5
}

fn default_refill() -> f64 {
    0.1
}
