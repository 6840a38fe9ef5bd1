//! A small axum imitation of the hosted storefront API.
//!
//! Mirrors its routes, payload shapes and `{ "message": ... }` error bodies
//! closely enough for the client to be exercised end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

type Reply = Result<Response, Response>;

#[derive(Clone)]
pub struct FakeProduct {
    pub id: &'static str,
    pub title: &'static str,
    pub price: f64,
}

#[derive(Default)]
pub struct FakeState {
    pub token: String,
    pub products: Vec<FakeProduct>,
    pub cart: Vec<(String, i64)>,
    pub wishlist: Vec<String>,
    pub orders: HashMap<String, Vec<(String, i64)>>,
    /// `METHOD /path` of every request received, in order.
    pub requests: Vec<String>,
    /// Answer everything with a 500.
    pub outage: bool,
    /// Answer reads (`GET`) with a 500.
    pub read_outage: bool,
    pub delay: Option<Duration>,
}

#[derive(Clone)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new(token: &str) -> Self {
        let state = FakeState {
            token: token.to_string(),
            products: vec![
                FakeProduct { id: "p1", title: "Woman Shawl", price: 100.0 },
                FakeProduct { id: "p2", title: "Leather Bag", price: 40.0 },
                FakeProduct { id: "p9", title: "Canvas Tote Bag Large", price: 250.0 },
            ],
            ..FakeState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    /// Bind to port 0 and return the API base URL.
    pub async fn start(&self) -> String {
        let app = Router::new().nest("/api/v1", router(self.clone()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/v1")
    }

    /// Record the request and apply the configured delay and outage.
    async fn enter(&self, label: String) -> Result<(), Response> {
        let read = label.starts_with("GET ");
        let delay = {
            let mut state = self.state();
            state.requests.push(label);
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failing = {
            let state = self.state();
            state.outage || (read && state.read_outage)
        };
        if failing {
            return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"));
        }
        Ok(())
    }
}

/// Build a JWT-shaped token for `user_id`.
pub fn token_for(user_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "id": user_id, "role": "user" }).to_string());
    format!("{header}.{payload}.sig")
}

fn router(api: FakeApi) -> Router {
    Router::new()
        .route("/cart", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/cart/:id", put(update_count).delete(remove_line))
        .route("/wishlist", get(get_wishlist).post(add_to_wishlist))
        .route("/wishlist/:id", delete(remove_from_wishlist))
        .route("/products", get(list_products))
        .route("/orders/user/:id", get(user_orders))
        .with_state(api)
}

#[derive(Deserialize)]
struct ProductIdBody {
    #[serde(rename = "productId")]
    product_id: String,
}

#[derive(Deserialize)]
struct CountBody {
    count: i64,
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "statusMsg": "fail", "message": message }))).into_response()
}

fn authorize(state: &FakeState, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers.get("token").and_then(|value| value.to_str().ok());
    if token == Some(state.token.as_str()) {
        Ok(())
    } else {
        Err(error(
            StatusCode::UNAUTHORIZED,
            "Invalid Token. please login again",
        ))
    }
}

fn product<'a>(state: &'a FakeState, id: &str) -> Result<&'a FakeProduct, Response> {
    state
        .products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "No product for this id"))
}

fn product_json(p: &FakeProduct) -> Value {
    json!({
        "_id": p.id,
        "title": p.title,
        "price": p.price,
        "imageCover": format!("{}.jpeg", p.id),
        "ratingsAverage": 4.5,
        "category": { "_id": "c1", "name": "Women's Fashion" },
    })
}

fn cart_json(state: &FakeState) -> Result<Value, Response> {
    let mut total = 0.0;
    let mut products = Vec::new();
    for (id, count) in &state.cart {
        let p = product(state, id)?;
        total += p.price * (*count as f64);
        products.push(json!({
            "count": count,
            "price": p.price,
            "product": { "_id": p.id, "title": p.title, "imageCover": format!("{}.jpeg", p.id) },
        }));
    }
    Ok(json!({
        "status": "success",
        "numOfCartItems": products.len(),
        "cartId": "cart-7",
        "data": { "_id": "cart-7", "totalCartPrice": total, "products": products },
    }))
}

fn ok(body: Value) -> Response {
    Json(body).into_response()
}

async fn get_cart(State(api): State<FakeApi>, headers: HeaderMap) -> Reply {
    api.enter("GET /cart".into()).await?;
    let state = api.state();
    authorize(&state, &headers)?;
    Ok(ok(cart_json(&state)?))
}

async fn add_to_cart(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(body): Json<ProductIdBody>,
) -> Reply {
    api.enter("POST /cart".into()).await?;
    let mut state = api.state();
    authorize(&state, &headers)?;
    product(&state, &body.product_id)?;
    match state.cart.iter_mut().find(|(id, _)| *id == body.product_id) {
        Some((_, count)) => *count += 1,
        None => state.cart.push((body.product_id, 1)),
    }
    let body = cart_json(&state)?;
    Ok(ok(json!({ "message": "Product added successfully to your cart", "data": body["data"] })))
}

async fn update_count(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<CountBody>,
) -> Reply {
    api.enter(format!("PUT /cart/{id}")).await?;
    let mut state = api.state();
    authorize(&state, &headers)?;
    if body.count < 1 {
        return Err(error(StatusCode::BAD_REQUEST, "count must be at least 1"));
    }
    let line = state
        .cart
        .iter_mut()
        .find(|(line, _)| *line == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "product not in cart"))?;
    line.1 = body.count;
    Ok(ok(cart_json(&state)?))
}

async fn remove_line(State(api): State<FakeApi>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    api.enter(format!("DELETE /cart/{id}")).await?;
    let mut state = api.state();
    authorize(&state, &headers)?;
    state.cart.retain(|(line, _)| *line != id);
    Ok(ok(cart_json(&state)?))
}

async fn clear_cart(State(api): State<FakeApi>, headers: HeaderMap) -> Reply {
    api.enter("DELETE /cart".into()).await?;
    let mut state = api.state();
    authorize(&state, &headers)?;
    state.cart.clear();
    Ok(ok(json!({ "message": "success" })))
}

async fn get_wishlist(State(api): State<FakeApi>, headers: HeaderMap) -> Reply {
    api.enter("GET /wishlist".into()).await?;
    let state = api.state();
    authorize(&state, &headers)?;
    let mut data = Vec::new();
    for id in &state.wishlist {
        data.push(product_json(product(&state, id)?));
    }
    Ok(ok(json!({ "status": "success", "count": data.len(), "data": data })))
}

async fn add_to_wishlist(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(body): Json<ProductIdBody>,
) -> Reply {
    api.enter("POST /wishlist".into()).await?;
    let mut state = api.state();
    authorize(&state, &headers)?;
    product(&state, &body.product_id)?;
    if !state.wishlist.contains(&body.product_id) {
        state.wishlist.push(body.product_id);
    }
    Ok(ok(json!({
        "status": "success",
        "message": "Product added successfully to your wishlist",
        "data": state.wishlist,
    })))
}

async fn remove_from_wishlist(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    api.enter(format!("DELETE /wishlist/{id}")).await?;
    let mut state = api.state();
    authorize(&state, &headers)?;
    state.wishlist.retain(|item| *item != id);
    Ok(ok(json!({ "status": "success", "data": state.wishlist })))
}

async fn list_products(State(api): State<FakeApi>) -> Reply {
    api.enter("GET /products".into()).await?;
    let state = api.state();
    let data: Vec<Value> = state.products.iter().map(product_json).collect();
    Ok(ok(json!({ "results": data.len(), "metadata": { "currentPage": 1 }, "data": data })))
}

async fn user_orders(State(api): State<FakeApi>, Path(user_id): Path<String>) -> Reply {
    api.enter(format!("GET /orders/user/{user_id}")).await?;
    let state = api.state();
    let mut orders = Vec::new();
    for (n, (id, count)) in state.orders.get(&user_id).into_iter().flatten().enumerate() {
        let p = product(&state, id)?;
        orders.push(json!({
            "_id": format!("order-{}", n + 1),
            "isPaid": true,
            "isDelivered": n == 0,
            "totalOrderPrice": p.price * (*count as f64),
            "cartItems": [{
                "count": count,
                "price": p.price,
                "product": { "_id": p.id, "title": p.title, "imageCover": format!("{}.jpeg", p.id) },
            }],
        }));
    }
    Ok(ok(Value::Array(orders)))
}
