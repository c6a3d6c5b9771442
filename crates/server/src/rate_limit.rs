//! Token-bucket limiter keyed by identity.
//!
//! Checked before any snapshot fetch so an abusive caller cannot turn the
//! gateway into a backend amplifier.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;

pub struct RateLimiter {
    tokens_per_second: f64,
    max_tokens: f64,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(rate: f64, capacity: f64) -> Self {
        Self {
            tokens_per_second: rate,
            max_tokens: capacity,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock();

        let now = Instant::now();
        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: self.max_tokens,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            bucket.tokens =
                (bucket.tokens + elapsed * self.tokens_per_second).min(self.max_tokens);
            bucket.last_refill = now;
        }

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
