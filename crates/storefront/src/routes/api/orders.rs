//! Order API route handlers.
//!
//! Orders are append-mostly: creation fills in server-side defaults
//! (date, pending status, payment method), and the only mutation is
//! cancellation, which is gated on the status state machine. Detail
//! routes enforce ownership; the store itself does not.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use bazaar_core::{NewOrder, OrderStatus, RecordId};
use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::SessionOwner;
use crate::resource::StoreError;
use crate::state::AppState;

fn order_not_found(e: StoreError) -> AppError {
    if e.is_not_found() {
        AppError::NotFound("Order not found".to_owned())
    } else {
        AppError::from(e)
    }
}

/// `GET /api/orders` - the session owner's order history.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
) -> Result<impl IntoResponse> {
    let orders = state.client().orders_for_owner(&owner).await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// `POST /api/orders` - place an order.
///
/// Missing fields default server-side: status `Hazırlanıyor`, payment
/// method `credit`, date now. The owner always comes from the session,
/// never the body.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Json(body): Json<NewOrder>,
) -> Result<impl IntoResponse> {
    let order = body.into_order(owner, Utc::now());
    let created = state.client().create_order(&order).await?;
    Ok(Json(json!({
        "success": true,
        "orderId": created.id,
        "order": created,
    })))
}

/// `GET /api/orders/{id}` - order detail, owner only.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse> {
    let order = state
        .client()
        .get_order(&id)
        .await
        .map_err(order_not_found)?;

    if order.owner != owner {
        return Err(AppError::Forbidden);
    }
    Ok(Json(json!({ "success": true, "order": order })))
}

/// `DELETE /api/orders/{id}` - cancel a pending order.
///
/// Only pending orders can be cancelled; anything further along the
/// state machine gets 400 with a client-facing message.
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    SessionOwner(owner): SessionOwner,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse> {
    let mut order = state
        .client()
        .get_order(&id)
        .await
        .map_err(order_not_found)?;

    if order.owner != owner {
        return Err(AppError::Forbidden);
    }
    if !order.status.can_cancel() {
        return Err(AppError::BadRequest("Bu sipariş iptal edilemez".to_owned()));
    }

    order.status = OrderStatus::Cancelled;
    state
        .client()
        .replace_order(&id, &order)
        .await
        .map_err(order_not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Sipariş iptal edildi",
    })))
}
