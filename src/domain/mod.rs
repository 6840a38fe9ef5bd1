//! Storefront records as the client sees them.
//!
//! These are the shapes held in the query cache. Wire payloads are adapted
//! into them by the remote services.

mod cart;
mod order;
mod product;
mod wishlist;

pub use cart::{Cart, CartItem, CartSummary};
pub use order::{Order, OrderLine};
pub use product::Product;
pub use wishlist::WishlistItem;
