use serde::{Deserialize, Serialize};

use crate::{Item, Placeholder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Item)]
pub struct WishlistItem {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub image_cover: Option<String>,
}

impl WishlistItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image_cover: None,
        }
    }
}

impl Placeholder for WishlistItem {
    fn placeholder(id: &str) -> Self {
        Self::new(id, "", 0.0)
    }
}
