//! Cart API route handlers.
//!
//! All four verbs require a verified session cookie and operate on the
//! session owner's remote cart record through [`RemoteCart`], so the
//! HTTP surface and the reconciliation engine share one implementation
//! of the record-rewrite sequences.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use bazaar_core::{CartProduct, ProductId};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::engine::RemoteCart;
use crate::error::{AppError, Result};
use crate::middleware::SessionOwner;
use crate::state::AppState;

/// Body for `POST /api/cart`.
#[derive(Debug, Deserialize)]
pub struct AddBody {
    pub product: Option<CartProduct>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Body for `PUT /api/cart`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    #[serde(rename = "productId")]
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
}

/// Query for `DELETE /api/cart`.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    #[serde(rename = "productId")]
    pub product_id: Option<ProductId>,
}

fn envelope(items: &[bazaar_core::CartLine]) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "cart": items }))
}

/// `GET /api/cart` - the session owner's cart lines.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
) -> Result<impl IntoResponse> {
    let items = RemoteCart::new(state.client().clone(), owner)
        .fetch()
        .await?;
    Ok(envelope(&items))
}

/// `POST /api/cart` - add a product, merging into an existing line.
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Json(body): Json<AddBody>,
) -> Result<impl IntoResponse> {
    let product = body
        .product
        .ok_or_else(|| AppError::BadRequest("Product is required".to_owned()))?;

    let items = RemoteCart::new(state.client().clone(), owner)
        .add(product, body.quantity)
        .await?;
    Ok(envelope(&items))
}

/// `PUT /api/cart` - overwrite a line's quantity; zero removes it.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse> {
    let (Some(product_id), Some(quantity)) = (body.product_id, body.quantity) else {
        return Err(AppError::BadRequest("Invalid data".to_owned()));
    };
    let quantity =
        u32::try_from(quantity).map_err(|_| AppError::BadRequest("Invalid data".to_owned()))?;

    let items = RemoteCart::new(state.client().clone(), owner)
        .set_quantity(product_id, quantity)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound("Cart not found".to_owned())
            } else {
                AppError::from(e)
            }
        })?;
    Ok(envelope(&items))
}

/// `DELETE /api/cart` - remove one line (`?productId=`) or clear the
/// whole cart. An owner with no record gets an empty cart back.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Query(query): Query<RemoveQuery>,
) -> Result<impl IntoResponse> {
    let remote = RemoteCart::new(state.client().clone(), owner);
    let items = match query.product_id {
        Some(product_id) => remote.remove(product_id).await?,
        None => remote.clear().await?,
    };
    Ok(envelope(&items))
}
