//! The optimistic mutation protocol, independent of any transport.
//!
//! A mutation moves through exactly one of two transitions:
//!
//! ```text
//!            commit()
//! Applied ────────────► Committed
//!    │
//!    └────────────────► RolledBack
//!           rollback()
//! ```
//!
//! [`Applied`] holds the snapshot and the patched collection. Both
//! transitions consume it, so a mutation cannot be committed and rolled back.

mod apply;
mod request;
mod transition;

pub use apply::{insert_placeholder, remove, update_quantity};
pub use request::{MutationKind, MutationRequest};
pub use transition::{Applied, Committed, Outcome, RolledBack};
