//! Session rate limiting
//!
//! Sliding window evaluated at call time by counting the session's recent
//! records in the history store. No counter is kept in process.
//!
//! ⚠️ Count-then-insert is not atomic: concurrent requests from one session
//! can all pass the check before any insert lands, so a burst may exceed
//! `max_requests` by a few records.

use chrono::{DateTime, Duration, Utc};

use crate::store::{HistoryStore, StoreError};

pub const DEFAULT_MAX_REQUESTS: u64 = 10;
pub const DEFAULT_WINDOW_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiter {
    pub max_requests: u64,
    pub window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: Duration::seconds(DEFAULT_WINDOW_SECS),
        }
    }
}

impl RateLimiter {
    pub fn new(max_requests: u64, window_secs: i64) -> Self {
        Self {
            max_requests,
            window: Duration::seconds(window_secs),
        }
    }

    /// Decision for an already-known count
    pub fn allows(&self, recent: u64) -> bool {
        recent < self.max_requests
    }

    /// Returns true when the session may classify at `now`
    pub async fn check(
        &self,
        store: &dyn HistoryStore,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let recent = store.count_since(session_id, now - self.window).await?;
        let allowed = self.allows(recent);

        if !allowed {
            tracing::warn!(
                "Rate limit hit for session {}: {} scans in the last {}s",
                session_id, recent, self.window.num_seconds()
            );
        }

        Ok(allowed)
    }
}
