use serde::{Deserialize, Serialize};

use crate::Item;

/// A catalog entry from the product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Item)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub category: Option<String>,
    pub ratings_average: Option<f64>,
    pub image_cover: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            category: None,
            ratings_average: None,
            image_cover: None,
        }
    }

    /// The first three words of the title, as shown on listing cards.
    pub fn short_title(&self) -> String {
        self.title
            .split_whitespace()
            .take(3)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
