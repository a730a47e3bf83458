//! Cooldown gate around one full run, keyed on the last successful run.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::persist::StampStore;

/// Result of a guarded call when the wrapped operation itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Ran(T),
    /// Skipped: the previous success is younger than the cooldown.
    RateLimited { retry_in: Duration },
}

pub struct RateLimiter<S> {
    store: S,
    cooldown: Duration,
    clock: fn() -> DateTime<Utc>,
}

impl<S: StampStore> RateLimiter<S> {
    pub fn new(store: S, cooldown: Duration) -> Self {
        Self { store, cooldown, clock: Utc::now }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Run `op` unless the last success is inside the cooldown window.
    /// Only `Ok` results move the stamp forward; errors pass through untouched.
    pub async fn guard<F, Fut, T, E>(&self, op: F) -> Result<Guarded<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let now = (self.clock)();
        if let Some(retry_in) = self.remaining_cooldown(now).await {
            info!(retry_in_ms = retry_in.as_millis() as u64, "Rate limit enforced, skipping run");
            return Ok(Guarded::RateLimited { retry_in });
        }

        let value = op().await?;

        let finished = (self.clock)();
        if let Err(e) = self.store.save(finished).await {
            warn!(error = %e, "Could not record successful run");
        }
        Ok(Guarded::Ran(value))
    }

    async fn remaining_cooldown(&self, now: DateTime<Utc>) -> Option<Duration> {
        let last = match self.store.load().await {
            Ok(last) => last?,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable rate-limit state");
                return None;
            }
        };

        // a stamp from the future (clock stepped back) does not block
        let elapsed = (now - last).to_std().ok()?;
        debug!(elapsed_ms = elapsed.as_millis() as u64, "Time since last successful run");
        self.cooldown.checked_sub(elapsed).filter(|left| !left.is_zero())
    }
}
