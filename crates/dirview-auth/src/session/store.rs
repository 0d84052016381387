//! In-memory session storage with sliding and absolute expiry.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use dirview_core::config::SessionConfig;

use crate::clock::{Clock, SystemClock};
use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::password::hasher::fill_random;
use crate::users::UserDirectory;

/// Session token length in bytes before encoding (128 bits).
pub const TOKEN_LEN: usize = 16;

/// Upper bound applied to configured lifetimes, in minutes (about a century).
const MAX_POLICY_MINUTES: u64 = 100 * 365 * 24 * 60;

/// Verified against when the username is unknown, so every login attempt
/// costs one KDF run. Well-formed with a full-length salt and an all-zero
/// digest.
const UNKNOWN_USER_HASH: &str =
    "AAAAAAAAAAAAAAAAAAAAAA:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// An authenticated, time-bounded grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Username the session was issued to.
    pub user_id: String,
    /// Sliding deadline, moved forward on every successful validation.
    pub inactivity_expiry: DateTime<Utc>,
    /// Absolute deadline. Never changes.
    pub max_expiry: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.inactivity_expiry || now > self.max_expiry
    }
}

/// Owns every live session and the user registry handle.
///
/// All mutations, validation included, go through one write lock, so
/// concurrent validations of the same token are serialized.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    users: Arc<dyn UserDirectory>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    inactivity_timeout: Duration,
    max_session_duration: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("active", &self.sessions.read().len())
            .field("users", &self.users.len())
            .field("inactivity_timeout", &self.inactivity_timeout)
            .field("max_session_duration", &self.max_session_duration)
            .finish()
    }
}

impl SessionStore {
    /// Creates a store reading time from the system clock.
    pub fn new(users: Arc<dyn UserDirectory>, config: &SessionConfig) -> Self {
        Self::with_clock(users, config, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit time source.
    pub fn with_clock(
        users: Arc<dyn UserDirectory>,
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            users,
            hasher: PasswordHasher::new(),
            clock,
            inactivity_timeout: policy_minutes(config.inactivity_timeout_minutes),
            max_session_duration: policy_minutes(
                config.max_session_hours.saturating_mul(60),
            ),
        }
    }

    /// Authenticates `username` and issues a new session token.
    ///
    /// Runs the password KDF on the calling thread, once per call whether or
    /// not the user exists. Unknown users and wrong passwords produce the
    /// same error.
    pub fn create_session(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let verified = match self.users.find(username) {
            Some(user) => self.hasher.verify(password, &user.password_hash),
            None => {
                let _ = self.hasher.verify(password, UNKNOWN_USER_HASH);
                false
            }
        };

        if !verified {
            warn!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now();
        let session = Session {
            user_id: username.to_string(),
            inactivity_expiry: now + self.inactivity_timeout,
            max_expiry: now + self.max_session_duration,
        };

        let mut sessions = self.sessions.write();
        let token = loop {
            let candidate = generate_token()?;
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(token.clone(), session);
        drop(sessions);

        info!(username = %username, "Session created");
        Ok(token)
    }

    /// Validates `token`, sliding its inactivity deadline on success.
    ///
    /// An expired session is removed before `SessionExpired` is returned.
    pub fn validate_session(&self, token: &str) -> Result<String, AuthError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();

        let Some(session) = sessions.get_mut(token) else {
            return Err(AuthError::SessionNotFound);
        };

        if session.is_expired(now) {
            let user_id = session.user_id.clone();
            sessions.remove(token);
            debug!(username = %user_id, "Session expired on use");
            return Err(AuthError::SessionExpired);
        }

        session.inactivity_expiry = (now + self.inactivity_timeout).min(session.max_expiry);
        Ok(session.user_id.clone())
    }

    /// Removes `token`. Removing an unknown token is not an error.
    pub fn delete_session(&self, token: &str) {
        if let Some(session) = self.sessions.write().remove(token) {
            info!(username = %session.user_id, "Session deleted");
        }
    }

    /// Removes every session past either deadline. Returns how many went.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    /// Number of sessions currently held, expired-but-unswept included.
    pub fn active_sessions(&self) -> usize {
        self.sessions.read().len()
    }
}

fn generate_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_LEN];
    fill_random(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn policy_minutes(minutes: u64) -> Duration {
    // Bounded above, so the cast cannot wrap.
    Duration::minutes(minutes.min(MAX_POLICY_MINUTES) as i64)
}
