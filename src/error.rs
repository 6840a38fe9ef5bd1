use std::fmt;

use thiserror::Error;

/// Failure reported by one of the remote storefront services.
///
/// The controller treats every variant the same way (rollback), but the kind
/// is kept so user-facing messages can say what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The API was unreachable, timed out, or answered with a server error.
    #[error("network error: {0}")]
    Network(String),
    /// The credential was missing, expired or rejected.
    #[error("authentication error: {0}")]
    Auth(String),
    /// The referenced item does not exist server-side.
    #[error("not found: {0}")]
    NotFound(String),
    /// The server rejected the payload (e.g. an invalid quantity).
    #[error("validation error: {0}")]
    Validation(String),
    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoteError::Network(_) | RemoteError::Decode(_) => ErrorKind::Network,
            RemoteError::Auth(_) => ErrorKind::Auth,
            RemoteError::NotFound(_) => ErrorKind::NotFound,
            RemoteError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Map an HTTP status code from the remote API to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => RemoteError::Auth(body),
            404 => RemoteError::NotFound(body),
            400 | 409 | 422 => RemoteError::Validation(body),
            _ => RemoteError::Network(format!("status {}: {}", status, body)),
        }
    }

    /// Error returned when no credential is available for a request.
    pub fn missing_token() -> Self {
        RemoteError::Auth("no token available; sign in first".into())
    }
}

/// Coarse error category forwarded to notification sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Auth,
    NotFound,
    Validation,
}

impl ErrorKind {
    /// Short human-readable hint appended to failure notifications.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorKind::Network => "check your connection and try again",
            ErrorKind::Auth => "please sign in again",
            ErrorKind::NotFound => "the item no longer exists",
            ErrorKind::Validation => "the request was rejected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Auth => "auth",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Failure to run a collection operation.
///
/// Optimistic mutations never fail with a remote error here; those are
/// recovered by rollback and reported through
/// [`Outcome::RolledBack`](crate::Outcome::RolledBack). Operations that wait
/// for the server instead, such as clearing the cart, report it as
/// [`Rejected`](Self::Rejected).
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The collection has never been fetched and the initial load failed.
    #[error("collection {key} is not loaded: {source}")]
    NotLoaded {
        key: String,
        #[source]
        source: RemoteError,
    },
    /// The request kind does not belong to this collection.
    #[error("{request} cannot be applied to collection {key}")]
    Misrouted { key: String, request: String },
    /// The server refused a non-optimistic operation.
    #[error("request rejected: {0}")]
    Rejected(#[source] RemoteError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors raised by the query cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key was first registered with a different item type.
    #[error("query key {key} holds a different collection type")]
    TypeMismatch { key: String },
    #[error("query cache lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Errors raised by the per-collection mutation queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("mutation queue lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
