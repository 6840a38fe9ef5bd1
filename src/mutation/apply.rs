//! Local patches. Each returns a new collection; the input is left intact.

use crate::collection::{Collection, Item, Placeholder, Quantified};

/// Drop the item `id`. Absent ids are a no-op, not an error.
pub fn remove<T: Item>(collection: &Collection<T>, id: &str) -> Collection<T> {
    collection.without(id)
}

/// Set the count of item `id` to exactly `count`, leaving every other
/// field untouched. No clamping: zero and negative counts pass through.
pub fn update_quantity<T: Quantified>(
    collection: &Collection<T>,
    id: &str,
    count: i64,
) -> Collection<T> {
    collection.with_updated(id, |item| item.set_count(count))
}

/// Append a placeholder for `id` unless it is already present.
pub fn insert_placeholder<T: Placeholder>(collection: &Collection<T>, id: &str) -> Collection<T> {
    if collection.contains(id) {
        return collection.clone();
    }
    collection.with_appended(T::placeholder(id))
}
