//! Remote quota tracking and throttle decisions.
//!
//! The API declares its rate limit through response headers; this
//! module keeps the last-known quota plus the timestamp of the last
//! request, and answers the two questions the client asks before every
//! send: "must I wait for the quota window to reset?" and "must I wait
//! to honor the minimum inter-request interval?".
//!
//! The state lives behind one `tokio::sync::Mutex` owned by the client;
//! all reads, waits, and the provisional decrement happen inside a
//! single critical section per request, so concurrent searches sharing
//! a client cannot race past an exhausted quota.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::envelope::QuotaSnapshot;

/// Backoff applied on a 429 that carries no quota headers.
pub(crate) const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(1);

/// Last-known remote quota plus local request pacing state.
#[derive(Debug, Clone, Default)]
pub struct QuotaState {
    /// Calls remaining, as last declared by the API. `None` until the
    /// first response carrying quota headers arrives.
    pub remaining: Option<u64>,
    /// When the quota window resets.
    pub reset_at: Option<DateTime<Utc>>,
    /// Total calls allowed per window.
    pub limit: Option<u64>,
    /// When the last request was issued, for interval pacing.
    pub(crate) last_request_at: Option<DateTime<Utc>>,
}

impl QuotaState {
    /// How long to wait for the quota window to reset, if the quota is
    /// exhausted and the reset lies in the future.
    pub(crate) fn quota_wait(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.remaining != Some(0) {
            return None;
        }
        let reset = self.reset_at?;
        if now >= reset {
            return None;
        }
        (reset - now).to_std().ok()
    }

    /// How long to wait to keep the minimum interval between requests.
    pub(crate) fn interval_wait(
        &self,
        now: DateTime<Utc>,
        min_interval: Duration,
    ) -> Option<Duration> {
        let last = self.last_request_at?;
        let min = chrono::Duration::from_std(min_interval).ok()?;
        let elapsed = now - last;
        if elapsed >= min {
            return None;
        }
        (min - elapsed).to_std().ok()
    }

    /// Forget the exhaustion marker after waiting out a reset; the
    /// true remaining count is unknown until the next response says.
    pub(crate) fn clear_exhaustion(&mut self) {
        if self.remaining == Some(0) {
            self.remaining = None;
        }
    }

    /// Record that a request is being issued now. Provisionally
    /// decrements the remaining count so concurrent callers see the
    /// call they are about to consume.
    pub(crate) fn note_request(&mut self, now: DateTime<Utc>) {
        self.last_request_at = Some(now);
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Fold in the quota headers from a response. Absent headers leave
    /// the corresponding fields unchanged; depletion is never assumed.
    pub(crate) fn apply(&mut self, snapshot: &QuotaSnapshot) {
        if let Some(remaining) = snapshot.remaining {
            self.remaining = Some(remaining);
        }
        if let Some(reset_at) = snapshot.reset_at {
            self.reset_at = Some(reset_at);
        }
        if let Some(limit) = snapshot.limit {
            self.limit = Some(limit);
        }
    }

    /// A 429 means the quota is spent regardless of what the headers
    /// said about the remaining count.
    pub(crate) fn mark_exhausted(&mut self) {
        self.remaining = Some(0);
    }

    /// A 429 whose headers failed to describe the quota; mark it
    /// exhausted with a short reset so the next call waits instead of
    /// hot-looping.
    pub(crate) fn force_exhausted(&mut self, now: DateTime<Utc>, backoff: Duration) {
        self.remaining = Some(0);
        self.reset_at = Some(now + chrono::Duration::from_std(backoff).unwrap_or_default());
    }
}
