//! Remote storefront services.
//!
//! The API is an external, uncontrolled collaborator. These traits describe
//! what the client needs from it; [`HttpStorefront`] adapts the hosted REST
//! API to them and [`InMemoryStorefront`] is a scriptable stand-in.

#[cfg(feature = "http")]
mod http;
mod in_memory;
mod service;
#[cfg(feature = "http")]
mod wire;

#[cfg(feature = "http")]
pub use http::HttpStorefront;
pub use in_memory::{Hold, InMemoryStorefront, RemoteOp};
pub use service::{CartService, OrderService, ProductService, StorefrontApi, WishlistService};
