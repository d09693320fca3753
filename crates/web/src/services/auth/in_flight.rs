//! Registry of signups currently running, keyed by normalized email.

use std::time::Duration;

use moka::future::Cache;

/// Upper bound on concurrently tracked signups.
const MAX_IN_FLIGHT: u64 = 10_000;

/// Emails with a signup in progress.
///
/// Entries expire after the TTL, so a signup whose future is dropped before
/// [`finish`](Self::finish) runs does not block the email forever.
#[derive(Clone)]
pub struct InFlightSignups {
    entries: Cache<String, ()>,
}

impl InFlightSignups {
    /// Create a registry whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_IN_FLIGHT)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Mark `key` as in flight. Returns false if it already was.
    pub async fn begin(&self, key: &str) -> bool {
        self.entries
            .entry(key.to_string())
            .or_insert(())
            .await
            .is_fresh()
    }

    /// Release `key`.
    pub async fn finish(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Whether `key` is in flight.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
