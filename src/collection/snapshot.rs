use super::{Collection, Item};

/// The collection as it was right before an optimistic patch.
///
/// Restored verbatim on rollback, dropped on commit.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    collection: Collection<T>,
}

impl<T: Item> Snapshot<T> {
    pub fn take(collection: &Collection<T>) -> Self {
        Self {
            collection: collection.clone(),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn restore(self) -> Collection<T> {
        self.collection
    }
}
