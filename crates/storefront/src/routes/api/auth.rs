//! Session introspection route handler.

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use bazaar_core::OwnerId;
use serde_json::json;
use tracing::instrument;

use crate::middleware::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// `GET /api/auth/me` - the current user, or null.
///
/// Never errors: no cookie, an unknown user and an unreachable store
/// all yield `{ "user": null }` so clients can poll this without
/// special-casing failures.
#[instrument(skip(state, jar))]
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        return Json(json!({ "user": null }));
    };

    match state.client().get_user(&OwnerId::new(cookie.value())).await {
        Ok(user) => Json(json!({ "user": user })),
        Err(e) => {
            tracing::debug!(error = %e, "Session cookie did not resolve to a user");
            Json(json!({ "user": null }))
        }
    }
}
