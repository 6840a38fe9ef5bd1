use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::Notify;

use crate::error::QueueError;
use crate::mutation::MutationRequest;

use super::{Arena, SlotId};

/// A mutation waiting for (or holding) its collection's turn.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    pub key: String,
    /// The request's display form, or the operation name.
    pub label: String,
    /// `None` for operations that are not optimistic patches, such as
    /// clearing the cart.
    pub request: Option<MutationRequest>,
    pub enqueued_at: Instant,
}

#[derive(Debug, Default)]
struct Lane {
    waiting: VecDeque<SlotId>,
    applying: Option<SlotId>,
}

impl Lane {
    fn is_idle(&self) -> bool {
        self.waiting.is_empty() && self.applying.is_none()
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Arena<PendingMutation>,
    lanes: HashMap<String, Lane>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<QueueState>,
    wake: Notify,
}

impl Shared {
    fn state(&self, operation: &'static str) -> Result<MutexGuard<'_, QueueState>, QueueError> {
        self.state
            .lock()
            .map_err(|_| QueueError::LockPoisoned(operation))
    }
}

/// FIFO mutation queue with one lane per collection key.
///
/// Clone-friendly; clones share the same lanes.
#[derive(Clone, Default)]
pub struct MutationQueue {
    shared: Arc<Shared>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `request` is at the head of `key`'s lane and no other
    /// mutation is applying there.
    ///
    /// The turn is released when the returned [`QueueTurn`] is dropped.
    /// Dropping the future before it resolves removes the request from the
    /// lane.
    pub async fn enter(
        &self,
        key: &str,
        request: MutationRequest,
    ) -> Result<QueueTurn, QueueError> {
        let label = request.to_string();
        self.enqueue(key, label, Some(request)).await
    }

    /// Take `key`'s turn for an operation that changes the collection
    /// server-side without an optimistic patch.
    pub async fn enter_operation(&self, key: &str, label: &str) -> Result<QueueTurn, QueueError> {
        self.enqueue(key, label.to_string(), None).await
    }

    async fn enqueue(
        &self,
        key: &str,
        label: String,
        request: Option<MutationRequest>,
    ) -> Result<QueueTurn, QueueError> {
        let slot = {
            let mut state = self.shared.state("enqueue")?;
            let slot = state.pending.insert(PendingMutation {
                key: key.to_string(),
                label,
                request,
                enqueued_at: Instant::now(),
            });
            state.lanes.entry(key.to_string()).or_default().waiting.push_back(slot);
            slot
        };

        let mut turn = QueueTurn {
            shared: Arc::clone(&self.shared),
            key: key.to_string(),
            slot,
            acquired: false,
        };

        loop {
            let notified = self.shared.wake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.try_advance(key, slot)? {
                turn.acquired = true;
                return Ok(turn);
            }

            tracing::trace!(key, "mutation waiting for its turn");
            notified.await;
        }
    }

    /// Number of mutations queued or applying on `key`.
    pub fn pending(&self, key: &str) -> Result<usize, QueueError> {
        let state = self.shared.state("pending")?;
        Ok(state
            .lanes
            .get(key)
            .map(|lane| lane.waiting.len() + usize::from(lane.applying.is_some()))
            .unwrap_or(0))
    }

    /// The request currently holding `key`'s turn, if any.
    pub fn applying(&self, key: &str) -> Result<Option<PendingMutation>, QueueError> {
        let state = self.shared.state("applying")?;
        Ok(state
            .lanes
            .get(key)
            .and_then(|lane| lane.applying)
            .and_then(|slot| state.pending.get(slot))
            .cloned())
    }

    fn try_advance(&self, key: &str, slot: SlotId) -> Result<bool, QueueError> {
        let mut state = self.shared.state("advance")?;
        let Some(lane) = state.lanes.get_mut(key) else {
            return Ok(false);
        };
        if lane.applying.is_none() && lane.waiting.front() == Some(&slot) {
            lane.waiting.pop_front();
            lane.applying = Some(slot);
            return Ok(true);
        }
        Ok(false)
    }
}

/// Proof that a mutation holds its collection's turn.
pub struct QueueTurn {
    shared: Arc<Shared>,
    key: String,
    slot: SlotId,
    acquired: bool,
}

impl QueueTurn {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for QueueTurn {
    fn drop(&mut self) {
        // Release even if another holder panicked; lanes must not wedge.
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let state = &mut *state;

        if let Some(lane) = state.lanes.get_mut(&self.key) {
            if self.acquired && lane.applying == Some(self.slot) {
                lane.applying = None;
            } else {
                lane.waiting.retain(|queued| *queued != self.slot);
            }
            if lane.is_idle() {
                state.lanes.remove(&self.key);
            }
        }
        state.pending.remove(self.slot);
        drop(state);

        self.shared.wake.notify_waiters();
    }
}
