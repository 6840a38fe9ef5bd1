use std::sync::Arc;

use crate::auth::Session;
use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::CacheError;
use crate::notify::{NotificationSink, TracingNotifier};
use crate::remote::StorefrontApi;

use super::Storefront;

/// Builder for [`Storefront`].
///
/// Defaults: a signed-out session, an empty cache, [`ClientConfig::default`]
/// and a [`TracingNotifier`].
pub struct StorefrontBuilder<S> {
    api: Arc<S>,
    session: Session,
    cache: QueryCache,
    config: ClientConfig,
    notifier: Arc<dyn NotificationSink>,
}

impl<S: StorefrontApi> StorefrontBuilder<S> {
    pub fn new(api: Arc<S>) -> Self {
        Self {
            api,
            session: Session::new(),
            cache: QueryCache::new(),
            config: ClientConfig::default(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Share a session with the backend's token provider.
    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn cache(mut self, cache: QueryCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Fails only if the supplied cache already holds one of the storefront
    /// keys with another item type.
    pub fn build(self) -> Result<Storefront<S>, CacheError> {
        Storefront::from_parts(
            self.api,
            self.session,
            self.cache,
            self.config,
            self.notifier,
        )
    }
}
