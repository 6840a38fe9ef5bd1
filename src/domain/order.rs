use serde::{Deserialize, Serialize};

use crate::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Item)]
pub struct Order {
    pub id: String,
    pub is_delivered: bool,
    pub is_paid: bool,
    pub total_price: f64,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub title: String,
    pub count: i64,
    pub price: f64,
    pub image_cover: Option<String>,
}

impl Order {
    /// The line shown on the order history card.
    pub fn headline(&self) -> Option<&OrderLine> {
        self.lines.first()
    }

    pub fn delivery_label(&self) -> &'static str {
        if self.is_delivered {
            "Delivered"
        } else {
            "Not Delivered"
        }
    }
}
