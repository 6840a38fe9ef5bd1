use std::fmt;

use serde::{Deserialize, Serialize};

/// A user-initiated change to a cart or wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutationRequest {
    Remove { id: String },
    /// The count is sent as-is; the server decides whether it is valid.
    UpdateQuantity { id: String, count: i64 },
    AddToWishlist { id: String },
    RemoveFromWishlist { id: String },
}

/// Discriminant of a [`MutationRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Remove,
    UpdateQuantity,
    AddToWishlist,
    RemoveFromWishlist,
}

impl MutationRequest {
    pub fn remove(id: impl Into<String>) -> Self {
        MutationRequest::Remove { id: id.into() }
    }

    pub fn update_quantity(id: impl Into<String>, count: i64) -> Self {
        MutationRequest::UpdateQuantity {
            id: id.into(),
            count,
        }
    }

    pub fn add_to_wishlist(id: impl Into<String>) -> Self {
        MutationRequest::AddToWishlist { id: id.into() }
    }

    pub fn remove_from_wishlist(id: impl Into<String>) -> Self {
        MutationRequest::RemoveFromWishlist { id: id.into() }
    }

    /// The item (or product) id the request targets.
    pub fn id(&self) -> &str {
        match self {
            MutationRequest::Remove { id }
            | MutationRequest::UpdateQuantity { id, .. }
            | MutationRequest::AddToWishlist { id }
            | MutationRequest::RemoveFromWishlist { id } => id,
        }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::Remove { .. } => MutationKind::Remove,
            MutationRequest::UpdateQuantity { .. } => MutationKind::UpdateQuantity,
            MutationRequest::AddToWishlist { .. } => MutationKind::AddToWishlist,
            MutationRequest::RemoveFromWishlist { .. } => MutationKind::RemoveFromWishlist,
        }
    }
}

impl fmt::Display for MutationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationRequest::Remove { id } => write!(f, "remove({})", id),
            MutationRequest::UpdateQuantity { id, count } => {
                write!(f, "update_quantity({}, {})", id, count)
            }
            MutationRequest::AddToWishlist { id } => write!(f, "add_to_wishlist({})", id),
            MutationRequest::RemoveFromWishlist { id } => {
                write!(f, "remove_from_wishlist({})", id)
            }
        }
    }
}
