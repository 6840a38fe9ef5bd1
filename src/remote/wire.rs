//! Response and request shapes of the hosted storefront API.
//!
//! Only the fields the client reads are modelled; everything else is
//! ignored. Missing optional fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::domain::{Cart, CartItem, CartSummary, Order, OrderLine, Product, WishlistItem};

#[derive(Debug, Deserialize)]
pub(crate) struct CartEnvelope {
    #[serde(default)]
    pub data: Option<CartData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartData {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub total_cart_price: f64,
    #[serde(default)]
    pub products: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartLine {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub price: f64,
    pub product: ProductRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_cover: Option<String>,
}

/// `{ "data": [...] }` list responses (wishlist, products).
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductData {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_cover: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub ratings_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderData {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub total_order_price: f64,
    #[serde(default)]
    pub cart_items: Vec<OrderLineData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderLineData {
    #[serde(default = "one")]
    pub count: i64,
    #[serde(default)]
    pub price: f64,
    pub product: ProductRef,
}

fn one() -> i64 {
    1
}

/// `{ "message": "..." }` error bodies.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductIdBody<'a> {
    #[serde(rename = "productId")]
    pub product_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CountBody {
    pub count: i64,
}

impl From<CartEnvelope> for Cart {
    fn from(envelope: CartEnvelope) -> Self {
        let Some(data) = envelope.data else {
            return Cart::default();
        };
        Cart {
            summary: CartSummary {
                cart_id: data.id,
                total_price: data.total_cart_price,
            },
            items: data
                .products
                .into_iter()
                .map(|line| CartItem {
                    id: line.product.id,
                    count: line.count,
                    price: line.price,
                    title: line.product.title,
                    image_cover: line.product.image_cover,
                })
                .collect(),
        }
    }
}

impl From<ProductData> for WishlistItem {
    fn from(data: ProductData) -> Self {
        WishlistItem {
            id: data.id,
            title: data.title,
            price: data.price,
            image_cover: data.image_cover,
        }
    }
}

impl From<ProductData> for Product {
    fn from(data: ProductData) -> Self {
        Product {
            id: data.id,
            title: data.title,
            price: data.price,
            category: data.category.map(|c| c.name),
            ratings_average: data.ratings_average,
            image_cover: data.image_cover,
        }
    }
}

impl From<OrderData> for Order {
    fn from(data: OrderData) -> Self {
        Order {
            id: data.id,
            is_delivered: data.is_delivered,
            is_paid: data.is_paid,
            total_price: data.total_order_price,
            lines: data
                .cart_items
                .into_iter()
                .map(|line| OrderLine {
                    product_id: line.product.id,
                    title: line.product.title,
                    count: line.count,
                    price: line.price,
                    image_cover: line.product.image_cover,
                })
                .collect(),
        }
    }
}
