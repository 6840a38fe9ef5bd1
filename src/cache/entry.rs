use std::time::{Duration, Instant};

use crate::collection::{Collection, Item};

/// Why an entry was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOrigin {
    /// Nothing has been published since the slot was created or reset.
    Empty,
    /// Authoritative data from the remote API.
    Fetch,
    /// A local patch awaiting confirmation.
    Optimistic,
    /// The snapshot restored after a failed mutation.
    Rollback,
}

/// The current state of one cached query.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub collection: Option<Collection<T>>,
    /// Incremented on every publish, starting at 1.
    pub version: u64,
    pub origin: PublishOrigin,
    /// When the last authoritative fetch landed.
    pub fetched_at: Option<Instant>,
    /// Set when a refetch failed or the key was invalidated; cleared by the
    /// next successful fetch.
    pub stale: bool,
    /// Incremented by every reset. Work started in an older epoch must not
    /// publish into a newer one.
    pub epoch: u64,
}

impl<T: Item> Entry<T> {
    pub(crate) fn empty() -> Self {
        Self {
            collection: None,
            version: 0,
            origin: PublishOrigin::Empty,
            fetched_at: None,
            stale: false,
            epoch: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.collection.is_some()
    }

    /// Loaded, not flagged stale, and fetched within `stale_time`.
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        if self.stale || self.collection.is_none() {
            return false;
        }
        match self.fetched_at {
            Some(at) => at.elapsed() < stale_time,
            None => false,
        }
    }
}
