use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;

use crate::collection::{Collection, Item};

use super::{Entry, PublishOrigin};

/// One cache key and its published entry.
#[derive(Debug)]
pub struct Slot<T> {
    key: String,
    tx: watch::Sender<Entry<T>>,
}

impl<T: Item> Slot<T> {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(Entry::empty());
        Self {
            key: key.into(),
            tx,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// A copy of the current entry.
    pub fn current(&self) -> Entry<T> {
        self.tx.borrow().clone()
    }

    pub fn collection(&self) -> Option<Collection<T>> {
        self.tx.borrow().collection.clone()
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    pub fn subscribe(&self) -> watch::Receiver<Entry<T>> {
        self.tx.subscribe()
    }

    /// The current reset epoch. See [`publish_in`](Self::publish_in).
    pub fn epoch(&self) -> u64 {
        self.tx.borrow().epoch
    }

    /// Replace the visible collection. Returns the new version.
    pub fn publish(&self, collection: Collection<T>, origin: PublishOrigin) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|entry| {
            version = write(entry, collection, origin);
        });
        tracing::debug!(key = %self.key, version, ?origin, "published collection");
        version
    }

    /// Publish only if the slot has not been reset since `epoch` was read.
    ///
    /// Returns the new version, or `None` when the publish was discarded.
    pub fn publish_in(
        &self,
        epoch: u64,
        collection: Collection<T>,
        origin: PublishOrigin,
    ) -> Option<u64> {
        let mut version = None;
        self.tx.send_if_modified(|entry| {
            if entry.epoch != epoch {
                return false;
            }
            version = Some(write(entry, collection, origin));
            true
        });
        match version {
            Some(version) => {
                tracing::debug!(key = %self.key, version, ?origin, "published collection")
            }
            None => {
                tracing::debug!(key = %self.key, epoch, ?origin, "discarded publish from before reset")
            }
        }
        version
    }

    /// Keep the visible collection but flag it as out of date.
    pub fn mark_stale(&self) {
        self.tx.send_if_modified(|entry| {
            let changed = !entry.stale;
            entry.stale = true;
            changed
        });
    }

    /// [`mark_stale`](Self::mark_stale), unless the slot was reset since `epoch`.
    pub fn mark_stale_in(&self, epoch: u64) {
        self.tx.send_if_modified(|entry| {
            let changed = entry.epoch == epoch && !entry.stale;
            if changed {
                entry.stale = true;
            }
            changed
        });
    }

    /// Drop the collection entirely, as after logout.
    /// The version keeps counting up so subscribers never see it go back,
    /// and the epoch moves on so in-flight work cannot republish.
    pub fn reset(&self) {
        self.tx.send_modify(|entry| {
            let version = entry.version + 1;
            let epoch = entry.epoch + 1;
            *entry = Entry::empty();
            entry.version = version;
            entry.epoch = epoch;
        });
    }
}

fn write<T>(entry: &mut Entry<T>, collection: Collection<T>, origin: PublishOrigin) -> u64 {
    entry.version += 1;
    entry.collection = Some(collection);
    entry.origin = origin;
    if origin == PublishOrigin::Fetch {
        entry.fetched_at = Some(Instant::now());
        entry.stale = false;
    }
    entry.version
}

/// Type-erased view of a slot so the cache can hold slots of any item type.
pub(crate) trait ErasedSlot: Send + Sync {
    fn mark_stale(&self);

    fn reset(&self);

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Item> ErasedSlot for Slot<T> {
    fn mark_stale(&self) {
        Slot::mark_stale(self);
    }

    fn reset(&self) {
        Slot::reset(self);
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
