//! Storefront facade integration tests.
