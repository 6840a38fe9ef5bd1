use crate::collection::{Collection, Item, Snapshot};
use crate::error::RemoteError;

use super::MutationRequest;

/// A mutation whose optimistic patch is visible but not yet confirmed.
#[derive(Debug)]
pub struct Applied<T> {
    request: MutationRequest,
    snapshot: Snapshot<T>,
    patched: Collection<T>,
}

/// A mutation the server accepted. The snapshot is gone.
#[derive(Debug)]
pub struct Committed<T> {
    pub request: MutationRequest,
    pub patched: Collection<T>,
}

/// A mutation the server refused. `restored` is the pre-patch collection.
#[derive(Debug)]
pub struct RolledBack<T> {
    pub request: MutationRequest,
    pub restored: Collection<T>,
    pub error: RemoteError,
}

impl<T: Item> Applied<T> {
    /// Snapshot `collection` and compute the optimistic patch.
    pub fn new<F>(request: MutationRequest, collection: Collection<T>, patch: F) -> Self
    where
        F: FnOnce(&MutationRequest, &Collection<T>) -> Collection<T>,
    {
        let snapshot = Snapshot::take(&collection);
        let patched = patch(&request, &collection);
        Self {
            request,
            snapshot,
            patched,
        }
    }

    pub fn request(&self) -> &MutationRequest {
        &self.request
    }

    pub fn snapshot(&self) -> &Collection<T> {
        self.snapshot.collection()
    }

    pub fn patched(&self) -> &Collection<T> {
        &self.patched
    }

    pub fn commit(self) -> Committed<T> {
        Committed {
            request: self.request,
            patched: self.patched,
        }
    }

    pub fn rollback(self, error: RemoteError) -> RolledBack<T> {
        RolledBack {
            request: self.request,
            restored: self.snapshot.restore(),
            error,
        }
    }
}

/// Terminal result of one mutation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The remote call succeeded and a reconciling refetch was issued.
    Committed,
    /// The remote call failed and the prior collection was restored.
    RolledBack { error: RemoteError },
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed)
    }

    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            Outcome::Committed => None,
            Outcome::RolledBack { error } => Some(error),
        }
    }
}

impl<T> From<Committed<T>> for Outcome {
    fn from(_: Committed<T>) -> Self {
        Outcome::Committed
    }
}

impl<T> From<RolledBack<T>> for Outcome {
    fn from(rolled_back: RolledBack<T>) -> Self {
        Outcome::RolledBack {
            error: rolled_back.error,
        }
    }
}
