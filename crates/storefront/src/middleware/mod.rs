//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session extractors (cookie-backed, verified per request)

pub mod session;

pub use session::{
    MaybeSessionOwner, SESSION_COOKIE_NAME, SessionOwner, expired_session_cookie, session_cookie,
};
