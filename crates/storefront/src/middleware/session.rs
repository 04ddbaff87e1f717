//! Cookie-backed session extraction.
//!
//! The session cookie holds the owner's user ID directly; there is no
//! server-side session table. Extractors verify the ID against the
//! resource store through [`CookieOracle`] on every request, so a
//! cookie naming a deleted user degrades to the anonymous state
//! instead of erroring.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bazaar_core::OwnerId;

use crate::error::AppError;
use crate::session::{CookieOracle, SessionOracle};
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Extractor that requires a verified session owner.
///
/// Rejects with 401 and the `{"error": "Unauthorized"}` envelope when
/// the cookie is absent or does not resolve to a stored user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     SessionOwner(owner): SessionOwner,
/// ) -> impl IntoResponse {
///     format!("Hello, {owner}!")
/// }
/// ```
pub struct SessionOwner(pub OwnerId);

/// Rejection for [`SessionOwner`].
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        AppError::Unauthorized.into_response()
    }
}

impl FromRequestParts<AppState> for SessionOwner {
    type Rejection = Unauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_owner(parts, state).await.map(Self).ok_or(Unauthorized)
    }
}

/// Extractor that optionally resolves the session owner.
///
/// Unlike [`SessionOwner`], this never rejects: an absent or stale
/// cookie yields `None`.
pub struct MaybeSessionOwner(pub Option<OwnerId>);

impl FromRequestParts<AppState> for MaybeSessionOwner {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_owner(parts, state).await))
    }
}

async fn resolve_owner(parts: &mut Parts, state: &AppState) -> Option<OwnerId> {
    let jar = CookieJar::from_headers(&parts.headers);
    let cookie = jar
        .get(SESSION_COOKIE_NAME)
        .map(|c| OwnerId::new(c.value()));
    CookieOracle::new(state.client().clone(), cookie)
        .current_owner()
        .await
}

/// Build the session cookie for a freshly authenticated owner.
///
/// `HttpOnly`, `SameSite=Lax`, path `/`, 7-day max age. The value is
/// the owner's user ID.
#[must_use]
pub fn session_cookie(owner: &OwnerId) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, owner.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(SESSION_EXPIRY_SECONDS))
        .build()
}

/// Build the cookie that expires the session (logout).
#[must_use]
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}
