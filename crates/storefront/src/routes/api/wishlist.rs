//! Wishlist API route handlers.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use bazaar_core::{Product, ProductId};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::engine::RemoteWishlist;
use crate::error::{AppError, Result};
use crate::middleware::SessionOwner;
use crate::state::AppState;

/// Body for `POST /api/wishlist`.
#[derive(Debug, Deserialize)]
pub struct AddBody {
    pub product: Option<Product>,
}

/// Query for `DELETE /api/wishlist`.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    #[serde(rename = "productId")]
    pub product_id: Option<ProductId>,
}

fn envelope(items: &[Product]) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "wishlist": items }))
}

/// `GET /api/wishlist` - the session owner's wishlist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
) -> Result<impl IntoResponse> {
    let items = RemoteWishlist::new(state.client().clone(), owner)
        .fetch()
        .await?;
    Ok(envelope(&items))
}

/// `POST /api/wishlist` - add a product. Adding an already-wishlisted
/// product returns the unchanged wishlist without a write.
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Json(body): Json<AddBody>,
) -> Result<impl IntoResponse> {
    let product = body
        .product
        .ok_or_else(|| AppError::BadRequest("Product is required".to_owned()))?;

    let items = RemoteWishlist::new(state.client().clone(), owner)
        .add(product)
        .await?;
    Ok(envelope(&items))
}

/// `DELETE /api/wishlist` - remove a product. The `productId` query
/// parameter is required; an owner without a wishlist record gets 404.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Query(query): Query<RemoveQuery>,
) -> Result<impl IntoResponse> {
    let product_id = query
        .product_id
        .ok_or_else(|| AppError::BadRequest("Product ID is required".to_owned()))?;

    let items = RemoteWishlist::new(state.client().clone(), owner)
        .remove(product_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound("Wishlist not found".to_owned())
            } else {
                AppError::from(e)
            }
        })?;
    Ok(envelope(&items))
}
