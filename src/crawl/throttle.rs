// src/crawl/throttle.rs
// =============================================================================
// Politeness between page fetches.
//
// The engine calls `pause()` once after every page it processes, whether the
// fetch succeeded or not. What "pause" means is up to the implementation:
// - FixedDelay: sleep the same amount every time (the default)
// - TokenBucket: allow short bursts, hold an average rate
//
// Rust concepts:
// - Trait objects: the engine stores a Box<dyn Throttle>, so the policy is
//   picked at runtime from the command line
// - async-trait: lets an async method live in an object-safe trait
// =============================================================================

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[async_trait]
pub trait Throttle: Send {
    /// Waits until the next page may be fetched.
    async fn pause(&mut self);
}

/// Sleeps for a fixed duration after each page.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&mut self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// Token bucket refilled at `per_second` tokens per second, holding at most
/// `capacity` tokens. Each pause spends one token, waiting for it if needed.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    per_second: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// `per_second` must be greater than zero; config validation enforces it.
    pub fn new(per_second: u32, capacity: u32) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            per_second: f64::from(per_second.max(1)),
            tokens: capacity,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.per_second).min(self.capacity);
        self.last_refill = now;
    }
}

#[async_trait]
impl Throttle for TokenBucket {
    async fn pause(&mut self) {
        self.refill();

        if self.tokens < 1.0 {
            let missing = 1.0 - self.tokens;
            sleep(Duration::from_secs_f64(missing / self.per_second)).await;
            self.refill();
        }

        self.tokens = (self.tokens - 1.0).max(0.0);
    }
}
