use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::cache::{Entry, PublishOrigin, QueryCache, Slot};
use crate::collection::Collection;
use crate::config::ConcurrencyPolicy;
use crate::error::{CacheError, ControllerError, RemoteError};
use crate::mutation::{Applied, MutationRequest, Outcome};
use crate::notify::NotificationSink;
use crate::queue::{MutationQueue, QueueTurn};

use super::MutationTarget;

type Items<G> = Collection<<G as MutationTarget>::Item>;

/// Runs the optimistic mutation protocol for one cached collection.
pub struct MutationController<G: MutationTarget> {
    target: G,
    slot: Arc<Slot<G::Item>>,
    queue: MutationQueue,
    notifier: Arc<dyn NotificationSink>,
    policy: ConcurrencyPolicy,
    stale_time: Duration,
}

impl<G: MutationTarget> MutationController<G> {
    /// Bind `target` to its slot in `cache`.
    pub fn new(
        target: G,
        cache: &QueryCache,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, CacheError> {
        let slot = cache.slot::<G::Item>(target.key())?;
        Ok(Self {
            target,
            slot,
            queue: MutationQueue::new(),
            notifier,
            policy: ConcurrencyPolicy::default(),
            stale_time: Duration::ZERO,
        })
    }

    /// Share a queue with other controllers.
    pub fn with_queue(mut self, queue: MutationQueue) -> Self {
        self.queue = queue;
        self
    }

    pub fn with_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// How long a fetched collection satisfies [`load`](Self::load).
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn target(&self) -> &G {
        &self.target
    }

    pub fn key(&self) -> &'static str {
        self.target.key()
    }

    pub fn queue(&self) -> &MutationQueue {
        &self.queue
    }

    /// The visible collection, if one has been published.
    pub fn current(&self) -> Option<Items<G>> {
        self.slot.collection()
    }

    pub fn entry(&self) -> Entry<G::Item> {
        self.slot.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Entry<G::Item>> {
        self.slot.subscribe()
    }

    /// Fetch and publish the authoritative collection.
    ///
    /// On failure the visible collection is kept and flagged stale.
    pub async fn refetch(&self) -> Result<Items<G>, RemoteError> {
        self.refetch_in(self.slot.epoch()).await
    }

    // A reset while the fetch is in flight wins: the response is dropped.
    async fn refetch_in(&self, epoch: u64) -> Result<Items<G>, RemoteError> {
        match self.target.fetch().await {
            Ok(collection) => {
                self.slot
                    .publish_in(epoch, collection.clone(), PublishOrigin::Fetch);
                Ok(collection)
            }
            Err(error) => {
                self.slot.mark_stale_in(epoch);
                tracing::warn!(key = self.key(), %error, "refetch failed; keeping last known collection");
                Err(error)
            }
        }
    }

    /// The cached collection if still fresh, otherwise a refetch.
    pub async fn load(&self) -> Result<Items<G>, RemoteError> {
        let entry = self.slot.current();
        if entry.is_fresh(self.stale_time) {
            if let Some(collection) = entry.collection {
                return Ok(collection);
            }
        }
        self.refetch().await
    }

    /// Apply `request` to `collection` optimistically and settle it.
    ///
    /// The patched collection is published before the remote call is
    /// issued. Remote failures are never returned as errors: they restore
    /// `collection` and yield [`Outcome::RolledBack`].
    ///
    /// If the slot is reset while the call is in flight (logout), neither
    /// the rollback nor the reconciling refetch is published.
    ///
    /// Callers are responsible for not overlapping mutations on the same
    /// collection; [`submit`](Self::submit) does that for them.
    pub async fn execute(&self, request: MutationRequest, collection: Items<G>) -> Outcome {
        self.execute_in(self.slot.epoch(), request, collection).await
    }

    async fn execute_in(
        &self,
        epoch: u64,
        request: MutationRequest,
        collection: Items<G>,
    ) -> Outcome {
        let key = self.key();
        let applied = Applied::new(request, collection, |request, collection| {
            self.target.patch(request, collection)
        });
        tracing::debug!(key, request = %applied.request(), "applying optimistic patch");
        self.slot
            .publish_in(epoch, applied.patched().clone(), PublishOrigin::Optimistic);

        match self.target.send(applied.request()).await {
            Ok(()) => {
                let committed = applied.commit();
                tracing::info!(key, request = %committed.request, "mutation committed");
                self.notifier
                    .notify_success(&self.target.success_message(&committed.request));
                // A failed refetch leaves the patch visible and flagged stale.
                let _ = self.refetch_in(epoch).await;
                committed.into()
            }
            Err(error) => {
                let rolled_back = applied.rollback(error);
                self.slot
                    .publish_in(epoch, rolled_back.restored.clone(), PublishOrigin::Rollback);
                tracing::warn!(
                    key,
                    request = %rolled_back.request,
                    error = %rolled_back.error,
                    "mutation rolled back"
                );
                let message = format!(
                    "{}: {}",
                    self.target.failure_message(&rolled_back.request),
                    rolled_back.error.kind().hint()
                );
                self.notifier.notify_failure(&message);
                rolled_back.into()
            }
        }
    }

    /// Run `request` against the cached collection.
    ///
    /// Under [`ConcurrencyPolicy::Serialized`] this waits until no other
    /// mutation is in flight on the collection, so the snapshot is always
    /// taken from settled state. An unloaded collection is fetched first.
    pub async fn submit(&self, request: MutationRequest) -> Result<Outcome, ControllerError> {
        self.check_route(&request)?;
        let _turn = match self.policy {
            ConcurrencyPolicy::Serialized => {
                Some(self.queue.enter(self.key(), request.clone()).await?)
            }
            ConcurrencyPolicy::Unordered => None,
        };

        let epoch = self.slot.epoch();
        let collection = self.settled(epoch).await?;
        Ok(self.execute_in(epoch, request, collection).await)
    }

    /// Like [`submit`](Self::submit), but the request is built from the
    /// settled collection once this caller holds the turn.
    ///
    /// `label` names the operation in the queue while it waits.
    pub async fn submit_with<F>(&self, label: &str, build: F) -> Result<Outcome, ControllerError>
    where
        F: FnOnce(&Items<G>) -> MutationRequest + Send,
    {
        let _turn = self.exclusive(label).await?;

        let epoch = self.slot.epoch();
        let collection = self.settled(epoch).await?;
        let request = build(&collection);
        self.check_route(&request)?;
        Ok(self.execute_in(epoch, request, collection).await)
    }

    /// Take this collection's queue turn for a non-optimistic operation.
    ///
    /// Returns `None` under [`ConcurrencyPolicy::Unordered`]. Hold the turn
    /// across the remote call and the refetch that follows it.
    pub async fn exclusive(&self, label: &str) -> Result<Option<QueueTurn>, ControllerError> {
        Ok(match self.policy {
            ConcurrencyPolicy::Serialized => {
                Some(self.queue.enter_operation(self.key(), label).await?)
            }
            ConcurrencyPolicy::Unordered => None,
        })
    }

    fn check_route(&self, request: &MutationRequest) -> Result<(), ControllerError> {
        if self.target.accepts(request.kind()) {
            return Ok(());
        }
        Err(ControllerError::Misrouted {
            key: self.key().to_string(),
            request: request.to_string(),
        })
    }

    async fn settled(&self, epoch: u64) -> Result<Items<G>, ControllerError> {
        if let Some(collection) = self.slot.collection() {
            return Ok(collection);
        }
        self.refetch_in(epoch)
            .await
            .map_err(|source| ControllerError::NotLoaded {
                key: self.key().to_string(),
                source,
            })
    }
}
