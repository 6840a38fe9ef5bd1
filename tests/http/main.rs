//! HTTP client integration tests.
//!
//! Starts an axum fake of the storefront API and drives it through
//! `HttpStorefront`.

#![cfg(feature = "http")]

mod fake_api;
