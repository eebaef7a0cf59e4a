// Event cache
// Caller-owned TTL cache of fetched event lists, keyed by user id

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use crate::models::event::Event;

/// How long a fetched event list stays fresh by default.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    events: Vec<Event>,
    fetched_at: Instant,
}

/// TTL cache of per-user event lists.
///
/// Owned and passed explicitly by the caller; nothing here is process-wide
/// state. A mutation to the store should be followed by `invalidate` so the
/// next read goes back to the API.
pub struct EventCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl EventCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// The cached events for a user, if fetched within the TTL.
    pub fn fresh(&self, user_id: &str) -> Option<&[Event]> {
        let entry = self.entries.get(user_id)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(&entry.events)
        } else {
            None
        }
    }

    /// Store a freshly fetched event list.
    pub fn insert(&mut self, user_id: impl Into<String>, events: Vec<Event>) {
        let user_id = user_id.into();
        debug!("Caching {} events for user {}", events.len(), user_id);
        self.entries.insert(
            user_id,
            CacheEntry {
                events,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop one user's entry, forcing the next read to re-fetch.
    pub fn invalidate(&mut self, user_id: &str) {
        self.entries.remove(user_id);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
