//! Per-user cooldown gate for hug requests

use chrono::{DateTime, Duration, SubsecRound, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use hugbot_common::{format_timestamp, UserId};
use tracing::debug;

/// Default time a user must wait between two requests.
pub const DEFAULT_COOLDOWN_HOURS: u32 = 24;

/// Decides whether a user may trigger another notification.
///
/// Holds the last accepted request time, in whole seconds, for every user
/// seen since startup. Entries are overwritten on every accepted request and never pruned; the
/// map is lost on restart.
#[derive(Debug)]
pub struct CooldownGate {
    /// Last accepted request per user
    last_requests: DashMap<UserId, DateTime<Utc>>,
    /// Minimum time between two accepted requests of one user
    window: Duration,
}

impl CooldownGate {
    /// Creates a gate with the given cooldown window.
    pub fn new(window: Duration) -> Self {
        Self {
            last_requests: DashMap::new(),
            window,
        }
    }

    /// Creates a gate whose window is a whole number of hours.
    pub fn from_hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    /// The cooldown window.
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Accepts the request if the user is outside their cooldown, now.
    pub fn try_consume(&self, user_id: UserId) -> bool {
        self.try_consume_at(user_id, Utc::now())
    }

    /// Accepts the request if `now` is at or past the user's last accepted
    /// request plus the window, recording `now` (truncated to the second) as
    /// the new last request.
    ///
    /// Check and update happen under the entry's shard lock, so concurrent
    /// calls for one user can never both be accepted inside one window.
    pub fn try_consume_at(&self, user_id: UserId, now: DateTime<Utc>) -> bool {
        let now = now.trunc_subsecs(0);
        match self.last_requests.entry(user_id) {
            Entry::Occupied(mut entry) => {
                let next_allowed = self.next_allowed(*entry.get());
                if now < next_allowed {
                    debug!(
                        "User {} on cooldown until {}",
                        user_id,
                        format_timestamp(next_allowed)
                    );
                    return false;
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }

        debug!("Recorded request from user {} at {}", user_id, format_timestamp(now));
        true
    }

    /// Time left before the user may request again, if any.
    pub fn remaining(&self, user_id: UserId, now: DateTime<Utc>) -> Option<Duration> {
        let last = *self.last_requests.get(&user_id)?;
        let remaining = self.next_allowed(last) - now;
        (remaining > Duration::zero()).then_some(remaining)
    }

    /// Earliest instant the next request is accepted; saturates at the end of
    /// representable time, so an oversized window never expires.
    fn next_allowed(&self, last: DateTime<Utc>) -> DateTime<Utc> {
        last.checked_add_signed(self.window).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Last accepted request of a user.
    pub fn last_request(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        self.last_requests.get(&user_id).map(|entry| *entry)
    }

    /// Number of users with a recorded request.
    pub fn len(&self) -> usize {
        self.last_requests.len()
    }

    /// Whether no request has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.last_requests.is_empty()
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::from_hours(DEFAULT_COOLDOWN_HOURS)
    }
}
