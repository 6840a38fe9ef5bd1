use async_trait::async_trait;

use crate::domain::{Cart, Order, Product, WishlistItem};
use crate::error::RemoteError;

/// The signed-in user's cart.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn fetch_cart(&self) -> Result<Cart, RemoteError>;

    async fn add_item(&self, product_id: &str) -> Result<(), RemoteError>;

    async fn remove_item(&self, product_id: &str) -> Result<(), RemoteError>;

    /// The server may reject counts it considers invalid.
    async fn update_quantity(&self, product_id: &str, count: i64) -> Result<(), RemoteError>;

    async fn clear_cart(&self) -> Result<(), RemoteError>;
}

/// The signed-in user's wishlist.
#[async_trait]
pub trait WishlistService: Send + Sync {
    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, RemoteError>;

    async fn add_wishlist_item(&self, product_id: &str) -> Result<(), RemoteError>;

    async fn remove_wishlist_item(&self, product_id: &str) -> Result<(), RemoteError>;
}

/// The public product catalog.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>, RemoteError>;
}

/// Everything the storefront needs from one backend.
pub trait StorefrontApi:
    CartService + WishlistService + ProductService + OrderService + 'static
{
}

impl<T> StorefrontApi for T where
    T: CartService + WishlistService + ProductService + OrderService + 'static
{
}
