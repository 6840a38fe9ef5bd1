//! Storefront - the application context behind the cart, wishlist,
//! products and orders screens.
//!
//! Owns one backend, one [`Session`](crate::Session) and one
//! [`QueryCache`](crate::QueryCache), and routes every screen action to the
//! right controller or service.
//!
//! ## Example
//!
//! ```ignore
//! let storefront = Storefront::builder(Arc::new(api))
//!     .session(session)
//!     .config(ClientConfig::from_env()?)
//!     .build()?;
//!
//! storefront.cart().await?;
//! let outcome = storefront.update_quantity("p1", 3).await?;
//! ```

mod builder;
mod storefront;

pub use builder::StorefrontBuilder;
pub use storefront::{CartController, Storefront, WishlistController};
