//! Optimistic mutation controllers.
//!
//! A [`MutationController`] owns one cached collection and runs every
//! mutation on it through the same protocol:
//!
//! 1. snapshot the visible collection and publish the optimistic patch
//!    before any network round trip;
//! 2. issue exactly one remote call;
//! 3. on success notify and reconcile with a refetch, on failure restore
//!    the snapshot and notify with the error kind.
//!
//! What a mutation means for a given collection (the local patch, the
//! remote call, the messages) is supplied by a [`MutationTarget`].

mod controller;
mod target;

pub use controller::MutationController;
pub use target::{CartTarget, MutationTarget, WishlistTarget};
