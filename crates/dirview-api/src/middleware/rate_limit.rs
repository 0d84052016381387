//! Token bucket limiter for login attempts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

/// Buckets kept before full ones are pruned.
const MAX_TRACKED_KEYS: usize = 10_000;

/// Simple in-memory token bucket rate limiter, keyed by username.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Key → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self, now: Instant, rate: f64, max: f64) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(max);
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens: max_tokens.max(1),
            refill_rate: refill_rate.max(0.0),
        }
    }

    /// Attempts to consume a token for the given key.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        let max = self.max_tokens as f64;

        if buckets.len() >= MAX_TRACKED_KEYS && !buckets.contains_key(key) {
            let rate = self.refill_rate;
            buckets.retain(|_, bucket| {
                bucket.refill(now, rate, max);
                bucket.tokens < max
            });
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: max,
            last_refill: now,
        });
        bucket.refill(now, self.refill_rate, max);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
