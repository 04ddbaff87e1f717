//! Session oracle: who, if anyone, is currently authenticated.
//!
//! The session is an HTTP-only cookie named `session` whose value is
//! the owner identifier. The oracle answers the single question "is
//! there a currently authenticated owner" - it never errors, because
//! "anonymous user" is an expected first-class state, not an exception.

use std::future::Future;

use bazaar_core::OwnerId;

use crate::resource::ResourceClient;

/// Answers whether a request currently has an authenticated owner.
///
/// Injected into the reconciliation engines so tests can pin identity
/// without a cookie or a live user lookup.
pub trait SessionOracle: Send + Sync {
    /// Resolve the current owner, or `None` when anonymous.
    fn current_owner(&self) -> impl Future<Output = Option<OwnerId>> + Send;
}

/// Oracle backed by the `session` cookie and a user lookup.
///
/// The cookie value is only trusted after the user record it points at
/// is confirmed to exist. Any failure along the way - missing cookie,
/// unknown user, unreachable store - resolves to anonymous rather than
/// surfacing an error.
#[derive(Debug, Clone)]
pub struct CookieOracle {
    client: ResourceClient,
    cookie: Option<OwnerId>,
}

impl CookieOracle {
    /// Create an oracle for one request's cookie value.
    #[must_use]
    pub const fn new(client: ResourceClient, cookie: Option<OwnerId>) -> Self {
        Self { client, cookie }
    }
}

impl SessionOracle for CookieOracle {
    async fn current_owner(&self) -> Option<OwnerId> {
        let owner = self.cookie.as_ref()?;
        match self.client.get_user(owner).await {
            Ok(_) => Some(owner.clone()),
            Err(e) => {
                tracing::debug!(owner = %owner, error = %e, "Session cookie did not resolve to a user");
                None
            }
        }
    }
}

/// Oracle with a fixed answer.
///
/// Used by tests and by callers that have already resolved identity
/// (e.g., immediately after a login response).
#[derive(Debug, Clone)]
pub struct StaticOracle(pub Option<OwnerId>);

impl StaticOracle {
    /// An oracle that always reports the given owner.
    #[must_use]
    pub const fn authenticated(owner: OwnerId) -> Self {
        Self(Some(owner))
    }

    /// An oracle that always reports anonymous.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionOracle for StaticOracle {
    async fn current_owner(&self) -> Option<OwnerId> {
        self.0.clone()
    }
}
