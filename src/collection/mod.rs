//! Collections - immutable, ordered views of a cart or wishlist.
//!
//! A [`Collection`] is never edited in place. Every transition (fetch,
//! optimistic patch, rollback) produces a new value, so a reader holding an
//! older collection always sees a consistent, if stale, state.

mod collection;
mod item;
mod snapshot;

pub use collection::Collection;
pub use item::{Item, Placeholder, Quantified};
pub use snapshot::Snapshot;
