//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Session (JSON API, cookie-authenticated)
//! GET    /api/auth/me          - Current user or null, never errors
//!
//! # Cart (requires session cookie)
//! GET    /api/cart             - Current cart lines
//! POST   /api/cart             - Add a product (body: product, quantity)
//! PUT    /api/cart             - Overwrite a line quantity
//! DELETE /api/cart             - Remove one line (?productId=) or clear
//!
//! # Wishlist (requires session cookie)
//! GET    /api/wishlist         - Current wishlist
//! POST   /api/wishlist         - Add a product (duplicate is a no-op)
//! DELETE /api/wishlist         - Remove a product (?productId= required)
//!
//! # Orders (requires session cookie)
//! GET    /api/orders           - Order history for the session owner
//! POST   /api/orders           - Place an order
//! GET    /api/orders/{id}      - Order detail (ownership enforced)
//! DELETE /api/orders/{id}      - Cancel a pending order
//!
//! # Catalog proxy (public)
//! GET    /api/products         - Product listing
//! GET    /api/products/{id}    - Product detail
//!
//! # Auth actions
//! POST /auth/login/api         - Login, sets session cookie
//! POST /auth/signup/api        - Register, sets session cookie
//! POST /auth/logout/api        - Logout, expires session cookie
//! ```

pub mod api;
pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth action routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/api", post(auth::login))
        .route("/signup/api", post(auth::signup))
        .route("/logout/api", post(auth::logout))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(api::auth::me))
        .route(
            "/cart",
            get(api::cart::show)
                .post(api::cart::add)
                .put(api::cart::update)
                .delete(api::cart::remove),
        )
        .route(
            "/wishlist",
            get(api::wishlist::show)
                .post(api::wishlist::add)
                .delete(api::wishlist::remove),
        )
        .route("/orders", get(api::orders::index).post(api::orders::create))
        .route(
            "/orders/{id}",
            get(api::orders::show).delete(api::orders::cancel),
        )
        .route("/products", get(api::products::index))
        .route("/products/{id}", get(api::products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .nest("/auth", auth_routes())
}

/// Build the complete application with state and request tracing
/// applied. The binary wraps this in the Sentry tower layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
