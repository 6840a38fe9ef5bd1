use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::auth::{Session, Token, TokenProvider};
use crate::cache::{keys, Entry, PublishOrigin, QueryCache, Slot};
use crate::collection::Collection;
use crate::config::ClientConfig;
use crate::controller::{CartTarget, MutationController, WishlistTarget};
use crate::domain::{CartItem, CartSummary, Order, Product, WishlistItem};
use crate::error::{CacheError, ControllerError, RemoteError};
use crate::mutation::{MutationRequest, Outcome};
use crate::notify::NotificationSink;
use crate::queue::MutationQueue;
use crate::remote::StorefrontApi;

use super::StorefrontBuilder;

pub type CartController<S> = MutationController<CartTarget<S>>;
pub type WishlistController<S> = MutationController<WishlistTarget<S>>;

/// Cart, wishlist, catalog and order history for one signed-in user.
pub struct Storefront<S: StorefrontApi> {
    api: Arc<S>,
    session: Session,
    cache: QueryCache,
    config: ClientConfig,
    notifier: Arc<dyn NotificationSink>,
    cart: CartController<S>,
    wishlist: WishlistController<S>,
    products: Arc<Slot<Product>>,
    orders: Arc<Slot<Order>>,
    adding: Mutex<HashSet<String>>,
}

impl<S: StorefrontApi> Storefront<S> {
    pub fn builder(api: Arc<S>) -> StorefrontBuilder<S> {
        StorefrontBuilder::new(api)
    }

    pub(super) fn from_parts(
        api: Arc<S>,
        session: Session,
        cache: QueryCache,
        config: ClientConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, CacheError> {
        let queue = MutationQueue::new();
        let cart = MutationController::new(CartTarget::new(api.clone()), &cache, notifier.clone())?
            .with_queue(queue.clone())
            .with_policy(config.concurrency)
            .with_stale_time(config.cart_stale_time());
        let wishlist =
            MutationController::new(WishlistTarget::new(api.clone()), &cache, notifier.clone())?
                .with_queue(queue)
                .with_policy(config.concurrency)
                .with_stale_time(config.wishlist_stale_time());
        let products = cache.slot::<Product>(keys::PRODUCTS)?;
        let orders = cache.slot::<Order>(keys::ORDERS)?;

        Ok(Self {
            api,
            session,
            cache,
            config,
            notifier,
            cart,
            wishlist,
            products,
            orders,
            adding: Mutex::new(HashSet::new()),
        })
    }

    pub fn api(&self) -> &Arc<S> {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cart_controller(&self) -> &CartController<S> {
        &self.cart
    }

    pub fn wishlist_controller(&self) -> &WishlistController<S> {
        &self.wishlist
    }

    // -- session --

    pub fn login(&self, token: Token) {
        self.session.login(token);
        tracing::info!("signed in");
    }

    /// Drop the token and every cached collection.
    ///
    /// Returns whether a token was present.
    pub fn logout(&self) -> Result<bool, CacheError> {
        let was_signed_in = self.session.logout();
        self.cache.clear()?;
        self.cart.target().forget_summary();
        tracing::info!(was_signed_in, "signed out");
        Ok(was_signed_in)
    }

    // -- cart --

    pub async fn cart(&self) -> Result<Collection<CartItem>, RemoteError> {
        self.cart.load().await
    }

    /// Cart id and server total from the last successful cart fetch.
    pub fn cart_summary(&self) -> Option<CartSummary> {
        self.cart.target().summary()
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<Entry<CartItem>> {
        self.cart.subscribe()
    }

    pub async fn remove_from_cart(&self, id: &str) -> Result<Outcome, ControllerError> {
        self.cart.submit(MutationRequest::remove(id)).await
    }

    pub async fn update_quantity(&self, id: &str, count: i64) -> Result<Outcome, ControllerError> {
        self.cart
            .submit(MutationRequest::update_quantity(id, count))
            .await
    }

    /// The `+` / `-` buttons: set the count relative to the visible one.
    ///
    /// The count is read once earlier cart mutations have settled. A line
    /// missing from the cart is treated as count zero.
    pub async fn adjust_quantity(&self, id: &str, delta: i64) -> Result<Outcome, ControllerError> {
        self.cart
            .submit_with("adjust_quantity", |cart| {
                let current = cart.get(id).map(|line| line.count).unwrap_or(0);
                MutationRequest::update_quantity(id, current + delta)
            })
            .await
    }

    /// Empty the cart server-side, then refetch.
    ///
    /// Not optimistic: the visible cart only changes once the server agrees.
    /// Waits behind cart mutations already in flight.
    pub async fn clear_cart(&self) -> Result<(), ControllerError> {
        let _turn = self.cart.exclusive("clear_cart").await?;
        match self.api.clear_cart().await {
            Ok(()) => {
                tracing::info!(key = keys::CART, "cart cleared");
                self.notifier.notify_success("Cart cleared successfully");
                let _ = self.cart.refetch().await;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(key = keys::CART, %error, "clear cart failed");
                self.notify_failure("Failed to clear cart", &error);
                Err(ControllerError::Rejected(error))
            }
        }
    }

    /// Add one unit of a product from the catalog.
    ///
    /// Returns `Ok(false)` without calling the API while an add for the
    /// same product is still in flight. Otherwise waits behind cart
    /// mutations already in flight.
    pub async fn add_to_cart(&self, id: &str) -> Result<bool, ControllerError> {
        let Some(_guard) = AddingGuard::acquire(&self.adding, id) else {
            tracing::debug!(id, "add to cart already in flight");
            return Ok(false);
        };
        let _turn = self.cart.exclusive("add_to_cart").await?;

        match self.api.add_item(id).await {
            Ok(()) => {
                tracing::info!(key = keys::CART, id, "added to cart");
                self.notifier.notify_success("Product added successfully");
                let _ = self.cart.refetch().await;
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(key = keys::CART, id, %error, "add to cart failed");
                self.notify_failure("Error Adding Product", &error);
                Err(ControllerError::Rejected(error))
            }
        }
    }

    pub fn is_adding(&self, id: &str) -> bool {
        lock(&self.adding).contains(id)
    }

    // -- wishlist --

    pub async fn wishlist(&self) -> Result<Collection<WishlistItem>, RemoteError> {
        self.wishlist.load().await
    }

    pub fn subscribe_wishlist(&self) -> watch::Receiver<Entry<WishlistItem>> {
        self.wishlist.subscribe()
    }

    pub async fn add_to_wishlist(&self, id: &str) -> Result<Outcome, ControllerError> {
        self.wishlist
            .submit(MutationRequest::add_to_wishlist(id))
            .await
    }

    pub async fn remove_from_wishlist(&self, id: &str) -> Result<Outcome, ControllerError> {
        self.wishlist
            .submit(MutationRequest::remove_from_wishlist(id))
            .await
    }

    /// Whether the heart icon for `id` is filled, per the visible wishlist.
    pub fn is_wished(&self, id: &str) -> bool {
        self.wishlist
            .current()
            .map(|wishlist| wishlist.contains(id))
            .unwrap_or(false)
    }

    // -- catalog and orders --

    pub async fn products(&self) -> Result<Collection<Product>, RemoteError> {
        let entry = self.products.current();
        if entry.is_fresh(self.config.products_stale_time()) {
            if let Some(products) = entry.collection {
                return Ok(products);
            }
        }
        let epoch = self.products.epoch();
        let products = Collection::new(self.api.list_products().await?);
        self.products
            .publish_in(epoch, products.clone(), PublishOrigin::Fetch);
        Ok(products)
    }

    /// Order history of the signed-in user.
    ///
    /// The user id comes from the token claims; a missing or undecodable
    /// token is an auth error and nothing is requested.
    pub async fn orders(&self) -> Result<Collection<Order>, RemoteError> {
        let token = self.session.token().ok_or_else(RemoteError::missing_token)?;
        let claims = token
            .claims()
            .map_err(|e| RemoteError::Auth(e.to_string()))?;
        let epoch = self.orders.epoch();
        let orders = Collection::new(self.api.user_orders(&claims.id).await?);
        self.orders
            .publish_in(epoch, orders.clone(), PublishOrigin::Fetch);
        Ok(orders)
    }

    fn notify_failure(&self, message: &str, error: &RemoteError) {
        self.notifier
            .notify_failure(&format!("{}: {}", message, error.kind().hint()));
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|e| e.into_inner())
}

/// Marks a product as being added until dropped.
struct AddingGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl<'a> AddingGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, id: &str) -> Option<Self> {
        if !lock(set).insert(id.to_string()) {
            return None;
        }
        Some(Self {
            set,
            id: id.to_string(),
        })
    }
}

impl Drop for AddingGuard<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.id);
    }
}
