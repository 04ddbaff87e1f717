//! Catalog proxy route handlers.
//!
//! Thin pass-through to the resource store's product collection; the
//! list is returned as a bare JSON array, not an envelope, because
//! that is what catalog clients consume.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use bazaar_core::ProductId;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/products` - full product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state.client().list_products().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` - product detail.
///
/// Any store failure surfaces as 404: a missing product and an
/// unreachable catalog are indistinguishable to the client here.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = state
        .client()
        .get_product(id)
        .await
        .map_err(|_| AppError::NotFound("Product not found".to_owned()))?;
    Ok(Json(product))
}
