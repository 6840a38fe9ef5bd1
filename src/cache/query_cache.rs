use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::collection::Item;
use crate::error::CacheError;

use super::slot::{ErasedSlot, Slot};

/// In-memory query cache backed by a HashMap of slots.
///
/// Clone-friendly (cloning shares the same underlying storage). Slots are
/// created lazily on first lookup and live as long as the cache; `clear`
/// empties them instead of dropping them, so existing subscribers keep
/// receiving updates.
#[derive(Clone, Default)]
pub struct QueryCache {
    slots: Arc<RwLock<HashMap<String, Arc<dyn ErasedSlot>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the slot for `key`.
    ///
    /// Fails if `key` was first created with a different item type.
    pub fn slot<T: Item>(&self, key: &str) -> Result<Arc<Slot<T>>, CacheError> {
        if let Some(existing) = self.lookup(key)? {
            return downcast(key, existing);
        }

        let mut slots = self
            .slots
            .write()
            .map_err(|_| CacheError::LockPoisoned("slot create"))?;
        let erased = slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Slot::<T>::new(key)) as Arc<dyn ErasedSlot>)
            .clone();
        drop(slots);
        downcast(key, erased)
    }

    /// Flag `key` as stale. Unknown keys are ignored.
    pub fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        if let Some(slot) = self.lookup(key)? {
            slot.mark_stale();
        }
        Ok(())
    }

    /// Empty every slot, as on logout.
    pub fn clear(&self) -> Result<(), CacheError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| CacheError::LockPoisoned("clear"))?;
        for slot in slots.values() {
            slot.reset();
        }
        tracing::debug!(slots = slots.len(), "query cache cleared");
        Ok(())
    }

    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| CacheError::LockPoisoned("keys"))?;
        let mut keys: Vec<String> = slots.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn lookup(&self, key: &str) -> Result<Option<Arc<dyn ErasedSlot>>, CacheError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| CacheError::LockPoisoned("slot lookup"))?;
        Ok(slots.get(key).cloned())
    }
}

fn downcast<T: Item>(key: &str, erased: Arc<dyn ErasedSlot>) -> Result<Arc<Slot<T>>, CacheError> {
    erased
        .into_any()
        .downcast::<Slot<T>>()
        .map_err(|_| CacheError::TypeMismatch {
            key: key.to_string(),
        })
}
