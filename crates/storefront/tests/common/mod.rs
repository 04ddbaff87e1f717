//! Shared test harness: an in-process stand-in for the resource store
//! plus a helper that boots the storefront against it.
//!
//! The stand-in mimics the flat REST collection server the storefront
//! talks to in production: numeric auto-assigned ids, whole-record
//! PUT replacement, and - deliberately - a *loose* query filter that
//! matches on string prefixes. Production code must never trust the
//! query filter, so the harness makes trusting it fail visibly (a
//! query for `userId=1` also returns owner `10`).

// Each test binary uses a different subset of this harness.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;

/// Handle to a running fake resource store.
#[derive(Clone)]
pub struct FakeStore {
    pub addr: SocketAddr,
    inner: Arc<StoreInner>,
}

struct StoreInner {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicI64,
}

impl FakeStore {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a record with an auto-assigned numeric id; returns the id.
    pub async fn insert(&self, collection: &str, mut record: Value) -> i64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        record["id"] = json!(id);
        self.inner
            .collections
            .lock()
            .await
            .entry(collection.to_owned())
            .or_default()
            .push(record);
        id
    }

    /// Snapshot of a collection's records.
    pub async fn records(&self, collection: &str) -> Vec<Value> {
        self.inner
            .collections
            .lock()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

/// Render a JSON scalar the way a query string would.
fn value_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn list(
    State(store): State<FakeStore>,
    Path(collection): Path<String>,
    Query(filters): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let collections = store.inner.collections.lock().await;
    let records = collections.get(&collection).cloned().unwrap_or_default();

    // Prefix match, not exact: see the module docs.
    let matched = records
        .into_iter()
        .filter(|record| {
            filters.iter().all(|(key, wanted)| {
                record
                    .get(key)
                    .is_some_and(|v| value_str(v).starts_with(wanted.as_str()))
            })
        })
        .collect();
    Json(matched)
}

async fn get_one(
    State(store): State<FakeStore>,
    Path((collection, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let collections = store.inner.collections.lock().await;
    let found = collections
        .get(&collection)
        .and_then(|records| {
            records
                .iter()
                .find(|r| r.get("id").is_some_and(|v| value_str(v) == id))
        })
        .cloned();
    match found {
        Some(record) => (StatusCode::OK, Json(record)),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn create(
    State(store): State<FakeStore>,
    Path(collection): Path<String>,
    Json(mut record): Json<Value>,
) -> impl IntoResponse {
    let id = store.inner.next_id.fetch_add(1, Ordering::SeqCst);
    record["id"] = json!(id);
    store
        .inner
        .collections
        .lock()
        .await
        .entry(collection)
        .or_default()
        .push(record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn put_one(
    State(store): State<FakeStore>,
    Path((collection, id)): Path<(String, String)>,
    Json(mut record): Json<Value>,
) -> impl IntoResponse {
    let mut collections = store.inner.collections.lock().await;
    let Some(records) = collections.get_mut(&collection) else {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    };
    let Some(slot) = records
        .iter_mut()
        .find(|r| r.get("id").is_some_and(|v| value_str(v) == id))
    else {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    };

    // Whole-record replacement; the stored id survives.
    record["id"] = slot["id"].clone();
    *slot = record.clone();
    (StatusCode::OK, Json(record))
}

/// Boot the fake store on an ephemeral port.
pub async fn spawn_store() -> FakeStore {
    let inner = Arc::new(StoreInner {
        collections: Mutex::new(HashMap::new()),
        next_id: AtomicI64::new(1),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake store");
    let addr = listener.local_addr().expect("fake store addr");
    let store = FakeStore { addr, inner };

    let router = Router::new()
        .route("/{collection}", get(list).post(create))
        .route("/{collection}/{id}", get(get_one).put(put_one))
        .with_state(store.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake store");
    });

    store
}

/// Boot the storefront wired to the given fake store; returns its base URL.
pub async fn spawn_app(store: &FakeStore) -> String {
    let config = StorefrontConfig {
        resource_api_url: store.base_url(),
        host: "127.0.0.1".parse().expect("host"),
        port: 0,
        mirror_path: None,
        sentry_dsn: None,
    };
    let app = routes::app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind app");
    let addr = listener.local_addr().expect("app addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("app");
    });

    format!("http://{addr}")
}

/// A catalog product as stored in the products collection.
pub fn product_json(id: i64, price: f64) -> Value {
    json!({
        "id": id,
        "title": format!("product {id}"),
        "price": price,
        "image": format!("/images/{id}.jpg"),
        "category": "electronics",
    })
}

/// A minimal user record.
pub fn user_json(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "name": { "firstName": "Test", "lastName": "User" },
        "phone": "",
        "address": {
            "geolocation": { "lat": "0", "long": "0" },
            "city": "",
            "street": "",
            "number": 0,
            "zipcode": "",
        },
    })
}
