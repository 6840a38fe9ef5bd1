//! Per-collection mutation queue.
//!
//! Serialises mutations that target the same collection key: one mutation
//! applies at a time, the rest wait in FIFO order. Different keys never
//! block each other.

mod arena;
mod mutation_queue;

pub use arena::{Arena, SlotId};
pub use mutation_queue::{MutationQueue, PendingMutation, QueueTurn};
