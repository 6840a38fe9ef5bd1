use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::cache::keys;
use crate::collection::{Collection, Item};
use crate::domain::{CartItem, CartSummary, WishlistItem};
use crate::error::RemoteError;
use crate::mutation::{self, MutationKind, MutationRequest};
use crate::remote::{CartService, WishlistService};

/// Binds the mutation protocol to one remote collection.
#[async_trait]
pub trait MutationTarget: Send + Sync + 'static {
    type Item: Item;

    /// Query cache key of the collection.
    fn key(&self) -> &'static str;

    fn accepts(&self, kind: MutationKind) -> bool;

    /// The optimistic patch. Must not touch the network.
    fn patch(
        &self,
        request: &MutationRequest,
        collection: &Collection<Self::Item>,
    ) -> Collection<Self::Item>;

    /// The one remote call backing `request`.
    async fn send(&self, request: &MutationRequest) -> Result<(), RemoteError>;

    /// The authoritative collection.
    async fn fetch(&self) -> Result<Collection<Self::Item>, RemoteError>;

    fn success_message(&self, request: &MutationRequest) -> String;

    fn failure_message(&self, request: &MutationRequest) -> String;
}

fn misrouted(key: &str, request: &MutationRequest) -> RemoteError {
    RemoteError::Validation(format!("{} is not supported by the {}", request, key))
}

/// Cart lines: removal and quantity changes.
pub struct CartTarget<S> {
    service: Arc<S>,
    summary: RwLock<Option<CartSummary>>,
}

impl<S: CartService> CartTarget<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            summary: RwLock::new(None),
        }
    }

    /// Cart id and server total from the last successful fetch.
    pub fn summary(&self) -> Option<CartSummary> {
        self.summary
            .read()
            .map(|summary| summary.clone())
            .unwrap_or_default()
    }

    pub(crate) fn forget_summary(&self) {
        if let Ok(mut summary) = self.summary.write() {
            *summary = None;
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }
}

#[async_trait]
impl<S: CartService + 'static> MutationTarget for CartTarget<S> {
    type Item = CartItem;

    fn key(&self) -> &'static str {
        keys::CART
    }

    fn accepts(&self, kind: MutationKind) -> bool {
        matches!(kind, MutationKind::Remove | MutationKind::UpdateQuantity)
    }

    fn patch(
        &self,
        request: &MutationRequest,
        collection: &Collection<CartItem>,
    ) -> Collection<CartItem> {
        match request {
            MutationRequest::Remove { id } => mutation::remove(collection, id),
            MutationRequest::UpdateQuantity { id, count } => {
                mutation::update_quantity(collection, id, *count)
            }
            _ => collection.clone(),
        }
    }

    async fn send(&self, request: &MutationRequest) -> Result<(), RemoteError> {
        match request {
            MutationRequest::Remove { id } => self.service.remove_item(id).await,
            MutationRequest::UpdateQuantity { id, count } => {
                self.service.update_quantity(id, *count).await
            }
            _ => Err(misrouted(self.key(), request)),
        }
    }

    async fn fetch(&self) -> Result<Collection<CartItem>, RemoteError> {
        let cart = self.service.fetch_cart().await?;
        if let Ok(mut summary) = self.summary.write() {
            *summary = Some(cart.summary);
        }
        Ok(Collection::new(cart.items))
    }

    fn success_message(&self, request: &MutationRequest) -> String {
        match request.kind() {
            MutationKind::UpdateQuantity => "Product quantity updated".into(),
            _ => "Product removed successfully".into(),
        }
    }

    fn failure_message(&self, request: &MutationRequest) -> String {
        match request.kind() {
            MutationKind::UpdateQuantity => "Failed to update product quantity".into(),
            _ => "Failed to remove product".into(),
        }
    }
}

/// Wishlist entries: add and remove.
pub struct WishlistTarget<S> {
    service: Arc<S>,
}

impl<S: WishlistService> WishlistTarget<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: WishlistService + 'static> MutationTarget for WishlistTarget<S> {
    type Item = WishlistItem;

    fn key(&self) -> &'static str {
        keys::WISHLIST
    }

    fn accepts(&self, kind: MutationKind) -> bool {
        matches!(
            kind,
            MutationKind::AddToWishlist | MutationKind::RemoveFromWishlist
        )
    }

    fn patch(
        &self,
        request: &MutationRequest,
        collection: &Collection<WishlistItem>,
    ) -> Collection<WishlistItem> {
        match request {
            MutationRequest::AddToWishlist { id } => mutation::insert_placeholder(collection, id),
            MutationRequest::RemoveFromWishlist { id } => mutation::remove(collection, id),
            _ => collection.clone(),
        }
    }

    async fn send(&self, request: &MutationRequest) -> Result<(), RemoteError> {
        match request {
            MutationRequest::AddToWishlist { id } => self.service.add_wishlist_item(id).await,
            MutationRequest::RemoveFromWishlist { id } => {
                self.service.remove_wishlist_item(id).await
            }
            _ => Err(misrouted(self.key(), request)),
        }
    }

    async fn fetch(&self) -> Result<Collection<WishlistItem>, RemoteError> {
        Ok(Collection::new(self.service.fetch_wishlist().await?))
    }

    fn success_message(&self, request: &MutationRequest) -> String {
        match request.kind() {
            MutationKind::AddToWishlist => "Product added successfully to your Wishlist".into(),
            _ => "Product deleted successfully".into(),
        }
    }

    fn failure_message(&self, request: &MutationRequest) -> String {
        match request.kind() {
            MutationKind::AddToWishlist => "Error Adding Product".into(),
            _ => "Error deleting product".into(),
        }
    }
}
