//! Query cache - keyed, observable storage for server collections.
//!
//! Each key (`"cart"`, `"wishlist"`, ...) owns one [`Slot`] holding the
//! latest published [`Entry`]. Publishing replaces the entry wholesale and
//! wakes every subscriber.
//!
//! ## Example
//!
//! ```ignore
//! let cache = QueryCache::new();
//! let cart = cache.slot::<CartItem>(keys::CART)?;
//! let mut updates = cart.subscribe();
//! cart.publish(collection, PublishOrigin::Fetch);
//! updates.changed().await?;
//! ```

mod entry;
mod query_cache;
mod slot;

pub use entry::{Entry, PublishOrigin};
pub use query_cache::QueryCache;
pub use slot::Slot;

/// Well-known query keys.
pub mod keys {
    pub const CART: &str = "cart";
    pub const WISHLIST: &str = "wishlist";
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
}
