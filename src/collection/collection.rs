use std::sync::Arc;

use super::Item;

/// An ordered, immutable sequence of items.
///
/// Cloning is cheap (the items are shared). Transitions return a new
/// collection and leave `self` untouched.
#[derive(Debug)]
pub struct Collection<T> {
    items: Arc<[T]>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: Item> Default for Collection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Item> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Item> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Item> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Item ids in collection order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(Item::id).collect()
    }

    /// Identity comparison: same ids in the same order, other fields ignored.
    pub fn same_ids(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.id() == b.id())
    }

    /// Whether both values share the same backing storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// A collection without the item `id`. Returns `self` unchanged if absent.
    pub fn without(&self, id: &str) -> Self {
        if !self.contains(id) {
            return self.clone();
        }
        self.items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect()
    }

    /// A collection with `item` appended.
    pub fn with_appended(&self, item: T) -> Self {
        let mut items = self.items.to_vec();
        items.push(item);
        Self::new(items)
    }

    /// A collection where the item `id` has been passed through `f`.
    /// Returns `self` unchanged if absent.
    pub fn with_updated<F>(&self, id: &str, f: F) -> Self
    where
        F: FnOnce(&mut T),
    {
        let Some(position) = self.items.iter().position(|item| item.id() == id) else {
            return self.clone();
        };
        let mut items = self.items.to_vec();
        f(&mut items[position]);
        Self::new(items)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
