//! HTTP client for the hosted storefront API.
//!
//! Requires the `http` feature. Uses reqwest.
//!
//! ## Routes
//!
//! - `GET /cart`, `POST /cart`, `PUT /cart/:id`, `DELETE /cart/:id`, `DELETE /cart`
//! - `GET /wishlist`, `POST /wishlist`, `DELETE /wishlist/:id`
//! - `GET /products`
//! - `GET /orders/user/:user_id`
//!
//! Cart and wishlist routes send the credential in a `token` header.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::domain::{Cart, Order, Product, WishlistItem};
use crate::error::RemoteError;

use super::service::{CartService, OrderService, ProductService, WishlistService};
use super::wire::{
    CartEnvelope, CountBody, ErrorBody, ListEnvelope, OrderData, ProductData, ProductIdBody,
};

/// reqwest-backed implementation of every storefront service.
///
/// Clone-friendly; clones share the connection pool.
#[derive(Clone)]
pub struct HttpStorefront {
    client: reqwest::Client,
    config: ClientConfig,
    base: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpStorefront {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Self::with_client(client, config, tokens)
    }

    /// Fails with [`RemoteError::Validation`] if `config.base_url` is not a
    /// usable base URL.
    pub fn with_client(
        client: reqwest::Client,
        config: ClientConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, RemoteError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            RemoteError::Validation(format!("invalid base url {:?}: {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Validation(format!(
                "invalid base url {:?}: cannot carry a path",
                config.base_url
            )));
        }
        Ok(Self {
            client,
            config,
            base,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The base URL with `segments` appended, each percent-encoded as a
    /// single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteError::Validation(format!("base url {} cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A request carrying the current token. Fails before any I/O when
    /// signed out.
    fn authed(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        let token = self.tokens.token().ok_or_else(RemoteError::missing_token)?;
        Ok(self
            .client
            .request(method, self.endpoint(segments)?)
            .header("token", token.as_str()))
    }

    fn public(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    tracing::debug!(status = status.as_u16(), %message, "remote call failed");
    Err(RemoteError::from_status(status.as_u16(), message))
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
    send(request)
        .await?
        .json::<T>()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

async fn send_empty(request: RequestBuilder) -> Result<(), RemoteError> {
    send(request).await.map(|_| ())
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Network(format!("request timed out: {}", err))
    } else {
        RemoteError::Network(err.to_string())
    }
}

#[async_trait]
impl CartService for HttpStorefront {
    async fn fetch_cart(&self) -> Result<Cart, RemoteError> {
        let envelope: CartEnvelope = send_json(self.authed(Method::GET, &["cart"])?).await?;
        Ok(envelope.into())
    }

    async fn add_item(&self, product_id: &str) -> Result<(), RemoteError> {
        let request = self
            .authed(Method::POST, &["cart"])?
            .json(&ProductIdBody { product_id });
        send_empty(request).await
    }

    async fn remove_item(&self, product_id: &str) -> Result<(), RemoteError> {
        send_empty(self.authed(Method::DELETE, &["cart", product_id])?).await
    }

    async fn update_quantity(&self, product_id: &str, count: i64) -> Result<(), RemoteError> {
        let request = self
            .authed(Method::PUT, &["cart", product_id])?
            .json(&CountBody { count });
        send_empty(request).await
    }

    async fn clear_cart(&self) -> Result<(), RemoteError> {
        send_empty(self.authed(Method::DELETE, &["cart"])?).await
    }
}

#[async_trait]
impl WishlistService for HttpStorefront {
    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, RemoteError> {
        let list: ListEnvelope<ProductData> =
            send_json(self.authed(Method::GET, &["wishlist"])?).await?;
        Ok(list.data.into_iter().map(WishlistItem::from).collect())
    }

    async fn add_wishlist_item(&self, product_id: &str) -> Result<(), RemoteError> {
        let request = self
            .authed(Method::POST, &["wishlist"])?
            .json(&ProductIdBody { product_id });
        send_empty(request).await
    }

    async fn remove_wishlist_item(&self, product_id: &str) -> Result<(), RemoteError> {
        send_empty(self.authed(Method::DELETE, &["wishlist", product_id])?).await
    }
}

#[async_trait]
impl ProductService for HttpStorefront {
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        let list: ListEnvelope<ProductData> = send_json(self.public(Method::GET, &["products"])?).await?;
        Ok(list.data.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl OrderService for HttpStorefront {
    async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>, RemoteError> {
        let orders: Vec<OrderData> =
            send_json(self.public(Method::GET, &["orders", "user", user_id])?).await?;
        Ok(orders.into_iter().map(Order::from).collect())
    }
}
