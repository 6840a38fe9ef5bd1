//! Credentials attached to remote calls.
//!
//! The [`Session`] is the explicit replacement for browser-local token
//! storage: `login` sets the token, `logout` clears it.

mod session;
mod token;

pub use session::Session;
pub use token::{Claims, Token, TokenError, TokenProvider};

#[cfg(test)]
pub(crate) use token::encode_test_token;
