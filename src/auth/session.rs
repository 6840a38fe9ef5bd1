use std::sync::{Arc, RwLock};

use super::{Token, TokenProvider};

/// The signed-in state shared by every remote service.
///
/// Clone-friendly; clones observe the same login state.
#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<Token>>>,
}

impl Session {
    /// A signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        let session = Self::new();
        session.login(token);
        session
    }

    pub fn login(&self, token: Token) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token);
    }

    /// Clear the token. Returns whether one was set.
    pub fn logout(&self) -> bool {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        slot.take().is_some()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }
}

impl TokenProvider for Session {
    fn token(&self) -> Option<Token> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
