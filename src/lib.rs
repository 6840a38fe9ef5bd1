// Lets the derive macros name `storefront_sync::...` from inside this crate.
extern crate self as storefront_sync;

pub mod auth;
pub mod cache;
pub mod collection;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod mutation;
pub mod notify;
pub mod queue;
pub mod remote;
pub mod storefront;

pub use auth::{Claims, Session, Token, TokenError, TokenProvider};
pub use cache::{keys, Entry, PublishOrigin, QueryCache, Slot};
pub use collection::{Collection, Item, Placeholder, Quantified, Snapshot};
pub use config::{ClientConfig, ConcurrencyPolicy, ConfigError, DEFAULT_BASE_URL};
pub use controller::{CartTarget, MutationController, MutationTarget, WishlistTarget};
pub use domain::{Cart, CartItem, CartSummary, Order, OrderLine, Product, WishlistItem};
pub use error::{CacheError, ControllerError, ErrorKind, QueueError, RemoteError};
pub use mutation::{Applied, Committed, MutationKind, MutationRequest, Outcome, RolledBack};
#[cfg(feature = "emitter")]
pub use notify::EmitterNotifier;
pub use notify::{BufferNotifier, Notification, NotificationLevel, NotificationSink, TracingNotifier};
pub use queue::MutationQueue;
#[cfg(feature = "http")]
pub use remote::HttpStorefront;
pub use remote::{
    CartService, InMemoryStorefront, OrderService, ProductService, RemoteOp, StorefrontApi,
    WishlistService,
};
pub use storefront::{CartController, Storefront, StorefrontBuilder, WishlistController};

// `#[derive(Item)]`
pub use storefront_sync_macros::Item;
