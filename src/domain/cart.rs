use serde::{Deserialize, Serialize};

use crate::Item;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Item)]
pub struct CartItem {
    /// Product id; the cart API addresses lines by product.
    pub id: String,
    #[item(count)]
    pub count: i64,
    /// Unit price in EGP as reported by the server.
    pub price: f64,
    pub title: String,
    pub image_cover: Option<String>,
}

impl CartItem {
    pub fn new(id: impl Into<String>, count: i64, price: f64) -> Self {
        Self {
            id: id.into(),
            count,
            price,
            title: String::new(),
            image_cover: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Cart-level fields that live beside the item collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    /// Server cart id, used by the checkout routes.
    pub cart_id: Option<String>,
    pub total_price: f64,
}

/// The authoritative cart as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    pub summary: CartSummary,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Sum of `price * count` over all lines.
    pub fn line_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * item.count as f64)
            .sum()
    }
}
