//! Client configuration.
//!
//! Defaults match the hosted storefront API. Values can be overridden from
//! JSON or from the environment:
//!
//! - `STOREFRONT_API_URL`
//! - `STOREFRONT_TIMEOUT_MS`
//! - `STOREFRONT_CONCURRENCY` (`serialized` or `unordered`)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://ecommerce.routemisr.com/api/v1";

/// How overlapping mutations on one collection are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// One in-flight mutation per collection; later ones wait their turn.
    #[default]
    Serialized,
    /// Mutations overlap freely. Whichever rollback lands last wins.
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    /// How long a fetched cart counts as fresh.
    pub cart_stale_time_ms: u64,
    pub wishlist_stale_time_ms: u64,
    pub products_stale_time_ms: u64,
    pub concurrency: ConcurrencyPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            cart_stale_time_ms: 0,
            wishlist_stale_time_ms: 5_000,
            products_stale_time_ms: 0,
            concurrency: ConcurrencyPolicy::Serialized,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by any `STOREFRONT_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("STOREFRONT_API_URL") {
            config.base_url = url;
        }
        if let Some(raw) = lookup("STOREFRONT_TIMEOUT_MS") {
            config.request_timeout_ms = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "STOREFRONT_TIMEOUT_MS",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("STOREFRONT_CONCURRENCY") {
            config.concurrency = match raw.as_str() {
                "serialized" => ConcurrencyPolicy::Serialized,
                "unordered" => ConcurrencyPolicy::Unordered,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "STOREFRONT_CONCURRENCY",
                        value: raw,
                    })
                }
            };
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: ConcurrencyPolicy) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = duration_ms(timeout);
        self
    }

    pub fn with_wishlist_stale_time(mut self, stale_time: Duration) -> Self {
        self.wishlist_stale_time_ms = duration_ms(stale_time);
        self
    }

    pub fn with_cart_stale_time(mut self, stale_time: Duration) -> Self {
        self.cart_stale_time_ms = duration_ms(stale_time);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cart_stale_time(&self) -> Duration {
        Duration::from_millis(self.cart_stale_time_ms)
    }

    pub fn wishlist_stale_time(&self) -> Duration {
        Duration::from_millis(self.wishlist_stale_time_ms)
    }

    pub fn products_stale_time(&self) -> Duration {
        Duration::from_millis(self.products_stale_time_ms)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
