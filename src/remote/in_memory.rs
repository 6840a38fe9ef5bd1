//! InMemoryStorefront - scriptable stand-in for the remote API.
//!
//! Behaves like the hosted service for the happy path and lets callers
//! inject failures or hold calls open to observe in-flight state.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::auth::TokenProvider;
use crate::domain::{Cart, CartItem, CartSummary, Order, Product, WishlistItem};
use crate::error::RemoteError;

use super::service::{CartService, OrderService, ProductService, WishlistService};

/// Every remote operation, for scripting and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    FetchCart,
    AddCartItem,
    RemoveCartItem,
    UpdateQuantity,
    ClearCart,
    FetchWishlist,
    AddWishlistItem,
    RemoveWishlistItem,
    ListProducts,
    UserOrders,
}

impl RemoteOp {
    fn requires_token(&self) -> bool {
        !matches!(self, RemoteOp::ListProducts | RemoteOp::UserOrders)
    }
}

/// Keeps calls to one operation suspended until released.
#[derive(Clone)]
pub struct Hold {
    released: Arc<watch::Sender<bool>>,
}

impl Hold {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            released: Arc::new(tx),
        }
    }

    /// Let every held call (and any later one) proceed.
    pub fn release(&self) {
        self.released.send_replace(true);
    }

    async fn wait(&self) {
        let mut rx = self.released.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|released| *released).await;
    }
}

#[derive(Default)]
struct State {
    cart_id: String,
    catalog: Vec<Product>,
    cart: Vec<CartItem>,
    wishlist: Vec<WishlistItem>,
    orders: HashMap<String, Vec<Order>>,
    failures: HashMap<RemoteOp, VecDeque<RemoteError>>,
    holds: HashMap<RemoteOp, Hold>,
    calls: HashMap<RemoteOp, usize>,
}

/// In-memory storefront backend.
///
/// Clone-friendly (cloning shares the same state).
#[derive(Clone)]
pub struct InMemoryStorefront {
    state: Arc<Mutex<State>>,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl Default for InMemoryStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorefront {
    pub fn new() -> Self {
        let state = State {
            cart_id: "cart-1".to_string(),
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            tokens: None,
        }
    }

    /// Reject cart and wishlist calls with an auth error whenever the
    /// provider has no token.
    pub fn with_tokens(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_catalog(self, products: Vec<Product>) -> Self {
        self.state().catalog = products;
        self
    }

    pub fn with_cart(self, items: Vec<CartItem>) -> Self {
        self.set_cart(items);
        self
    }

    pub fn with_wishlist(self, items: Vec<WishlistItem>) -> Self {
        self.state().wishlist = items;
        self
    }

    pub fn with_orders(self, user_id: impl Into<String>, orders: Vec<Order>) -> Self {
        self.state().orders.insert(user_id.into(), orders);
        self
    }

    /// Replace the server-side cart, as another client would.
    pub fn set_cart(&self, items: Vec<CartItem>) {
        self.state().cart = items;
    }

    pub fn set_wishlist(&self, items: Vec<WishlistItem>) {
        self.state().wishlist = items;
    }

    pub fn cart_items(&self) -> Vec<CartItem> {
        self.state().cart.clone()
    }

    pub fn wishlist_items(&self) -> Vec<WishlistItem> {
        self.state().wishlist.clone()
    }

    /// Fail the next call to `op` with `error`. Queued failures are used in
    /// order.
    pub fn fail_next(&self, op: RemoteOp, error: RemoteError) {
        self.state().failures.entry(op).or_default().push_back(error);
    }

    /// Suspend calls to `op` until the returned hold is released.
    pub fn hold(&self, op: RemoteOp) -> Hold {
        let hold = Hold::new();
        self.state().holds.insert(op, hold.clone());
        hold
    }

    /// How many times `op` has been called.
    pub fn calls(&self, op: RemoteOp) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // The state is plain data; a panic elsewhere leaves it usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call, honour holds, auth and scripted failures.
    async fn begin(&self, op: RemoteOp) -> Result<(), RemoteError> {
        let hold = {
            let mut state = self.state();
            *state.calls.entry(op).or_default() += 1;
            state.holds.get(&op).cloned()
        };
        if let Some(hold) = hold {
            hold.wait().await;
        }

        if op.requires_token() {
            if let Some(tokens) = &self.tokens {
                if tokens.token().is_none() {
                    return Err(RemoteError::missing_token());
                }
            }
        }

        match self.state().failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn product(state: &State, product_id: &str) -> Result<Product, RemoteError> {
        state
            .catalog
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("no product with id {}", product_id)))
    }
}

#[async_trait]
impl CartService for InMemoryStorefront {
    async fn fetch_cart(&self) -> Result<Cart, RemoteError> {
        self.begin(RemoteOp::FetchCart).await?;
        let state = self.state();
        let mut cart = Cart {
            summary: CartSummary {
                cart_id: Some(state.cart_id.clone()),
                total_price: 0.0,
            },
            items: state.cart.clone(),
        };
        cart.summary.total_price = cart.line_total();
        Ok(cart)
    }

    async fn add_item(&self, product_id: &str) -> Result<(), RemoteError> {
        self.begin(RemoteOp::AddCartItem).await?;
        let mut state = self.state();
        let product = Self::product(&state, product_id)?;
        match state.cart.iter_mut().find(|line| line.id == product_id) {
            Some(line) => line.count += 1,
            None => state.cart.push(CartItem {
                id: product.id,
                count: 1,
                price: product.price,
                title: product.title,
                image_cover: product.image_cover,
            }),
        }
        Ok(())
    }

    async fn remove_item(&self, product_id: &str) -> Result<(), RemoteError> {
        self.begin(RemoteOp::RemoveCartItem).await?;
        self.state().cart.retain(|line| line.id != product_id);
        Ok(())
    }

    async fn update_quantity(&self, product_id: &str, count: i64) -> Result<(), RemoteError> {
        self.begin(RemoteOp::UpdateQuantity).await?;
        let mut state = self.state();
        let line = state
            .cart
            .iter_mut()
            .find(|line| line.id == product_id)
            .ok_or_else(|| RemoteError::NotFound(format!("no cart line for {}", product_id)))?;
        line.count = count;
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), RemoteError> {
        self.begin(RemoteOp::ClearCart).await?;
        self.state().cart.clear();
        Ok(())
    }
}

#[async_trait]
impl WishlistService for InMemoryStorefront {
    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, RemoteError> {
        self.begin(RemoteOp::FetchWishlist).await?;
        Ok(self.state().wishlist.clone())
    }

    async fn add_wishlist_item(&self, product_id: &str) -> Result<(), RemoteError> {
        self.begin(RemoteOp::AddWishlistItem).await?;
        let mut state = self.state();
        let product = Self::product(&state, product_id)?;
        if !state.wishlist.iter().any(|item| item.id == product_id) {
            state.wishlist.push(WishlistItem {
                id: product.id,
                title: product.title,
                price: product.price,
                image_cover: product.image_cover,
            });
        }
        Ok(())
    }

    async fn remove_wishlist_item(&self, product_id: &str) -> Result<(), RemoteError> {
        self.begin(RemoteOp::RemoveWishlistItem).await?;
        self.state().wishlist.retain(|item| item.id != product_id);
        Ok(())
    }
}

#[async_trait]
impl ProductService for InMemoryStorefront {
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        self.begin(RemoteOp::ListProducts).await?;
        Ok(self.state().catalog.clone())
    }
}

#[async_trait]
impl OrderService for InMemoryStorefront {
    async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>, RemoteError> {
        self.begin(RemoteOp::UserOrders).await?;
        Ok(self.state().orders.get(user_id).cloned().unwrap_or_default())
    }
}
