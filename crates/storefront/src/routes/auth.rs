//! Authentication route handlers.
//!
//! Login and signup resolve users through the resource store's `users`
//! collection and hand the client a session cookie whose value is the
//! user's record ID. The store holds passwords in plain text and
//! matching is an exact client-side comparison; the `?email=` query is
//! only a prefilter, since the store does not guarantee exact matches
//! or enforce uniqueness.

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use bazaar_core::{Address, User, UserName};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{expired_session_cookie, session_cookie};
use crate::state::AppState;

/// Body for `POST /auth/login/api`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for `POST /auth/signup/api`.
#[derive(Debug, Deserialize)]
pub struct SignupBody {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// `POST /auth/login/api` - authenticate and set the session cookie.
#[instrument(skip(state, jar, body))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_owned(),
        ));
    };
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_owned(),
        ));
    }

    let candidates = state.client().users_by_email(&email).await?;
    let user = candidates
        .into_iter()
        .find(|u| u.email == email && u.password == password)
        .ok_or(AppError::InvalidCredentials)?;

    let owner = user
        .id
        .ok_or_else(|| AppError::Internal("stored user has no id".to_owned()))?;

    set_sentry_user(&owner, Some(&email));
    tracing::info!(owner = %owner, "Login successful");

    Ok((
        jar.add(session_cookie(&owner)),
        Json(json!({ "success": true })),
    ))
}

/// `POST /auth/signup/api` - register a user and set the session cookie.
///
/// The duplicate check is a search-then-create: the store enforces no
/// uniqueness, so two concurrent signups with the same email can both
/// succeed. The first record wins at login time.
#[instrument(skip(state, jar, body))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password), Some(first_name), Some(last_name)) =
        (body.email, body.password, body.first_name, body.last_name)
    else {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    };
    if email.is_empty() || password.is_empty() || first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    }

    let existing = state.client().users_by_email(&email).await?;
    if existing.iter().any(|u| u.email == email) {
        return Err(AppError::Conflict("User already exists".to_owned()));
    }

    let user = User {
        id: None,
        email: email.clone(),
        password,
        name: UserName {
            first_name,
            last_name,
        },
        phone: String::new(),
        address: Address::default(),
    };
    let created = state.client().create_user(&user).await?;

    let owner = created
        .id
        .clone()
        .ok_or_else(|| AppError::Internal("store returned a user without an id".to_owned()))?;

    set_sentry_user(&owner, Some(&email));
    tracing::info!(owner = %owner, "Signup successful");

    Ok((
        jar.add(session_cookie(&owner)),
        Json(json!({ "success": true, "user": created })),
    ))
}

/// `POST /auth/logout/api` - expire the session cookie.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    clear_sentry_user();
    (
        jar.add(expired_session_cookie()),
        Json(json!({ "success": true, "message": "Çıkış yapıldı" })),
    )
}
