//! Optimistic mutation protocol integration tests.
//!
//! Drives `MutationController` against the in-memory backend.

mod scenarios;
mod concurrency;
mod reconcile;
