//! HTTP client for the external resource store.
//!
//! The store is a generic REST collection service (`/users`, `/products`,
//! `/carts`, `/orders`, `/wishlists`) with plain create/read/update/delete
//! semantics and no transactions. A logical read-modify-write is three
//! serial calls with no locking; concurrent writers against the same
//! owner can lose updates, and this layer makes no attempt to hide that.
//!
//! The `?userId=` query filter is not guaranteed to be an exact match by
//! every store deployment, so owner lookups always re-filter client-side.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use bazaar_core::{CartRecord, Order, OwnerId, Product, ProductId, RecordId, User, WishlistRecord};

/// Errors that can occur when talking to the resource store.
///
/// Every variant is a `RemoteUnavailable`-class condition from the
/// caller's point of view, except [`StoreError::NotFound`] which is a
/// definite answer from the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Resource store returned {status} for {path}")]
    Status { status: StatusCode, path: String },

    /// The addressed record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store's response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this error is a definite "record does not exist" answer.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A record type owned by a single user, keyed by `userId` on the wire.
pub trait OwnedRecord {
    /// The owner this record belongs to.
    fn owner(&self) -> &OwnerId;
}

impl OwnedRecord for CartRecord {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl OwnedRecord for WishlistRecord {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl OwnedRecord for Order {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

// =============================================================================
// ResourceClient
// =============================================================================

/// Client for the external resource store.
///
/// Cheaply cloneable via `Arc`; one instance is shared across all
/// handlers and engines.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    inner: Arc<ResourceClientInner>,
}

#[derive(Debug)]
struct ResourceClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ResourceClient {
    /// Create a new client against the given store base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(ResourceClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and decode the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(path.to_owned()));
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                path: path.to_owned(),
            });
        }

        // Read the body as text first for better parse diagnostics.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                path,
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Unexpected resource store response"
            );
            StoreError::Parse(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        self.execute(self.inner.client.get(self.url(path)), path)
            .await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, StoreError> {
        self.execute(self.inner.client.post(self.url(path)).json(body), path)
            .await
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, StoreError> {
        self.execute(self.inner.client.put(self.url(path)).json(body), path)
            .await
    }

    /// Fetch all records in a collection matching an owner, re-filtered
    /// client-side for an exact match.
    async fn records_for_owner<T>(
        &self,
        collection: &str,
        owner: &OwnerId,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + OwnedRecord,
    {
        let path = format!(
            "/{collection}?userId={}",
            urlencoding::encode(owner.as_str())
        );
        let records: Vec<T> = self.get_json(&path).await?;
        Ok(filter_exact_owner(records, owner))
    }

    /// Find the single record for an owner in a collection, if any.
    ///
    /// The store does not enforce owner uniqueness; when duplicates
    /// exist the first match wins, mirroring the search-then-create
    /// convention used on writes.
    async fn record_for_owner<T>(
        &self,
        collection: &str,
        owner: &OwnerId,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + OwnedRecord,
    {
        Ok(self
            .records_for_owner(collection, owner)
            .await?
            .into_iter()
            .next())
    }

    // =========================================================================
    // Carts
    // =========================================================================

    /// Find the cart record for an owner.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or answers
    /// with an error status.
    #[instrument(skip(self))]
    pub async fn find_cart(&self, owner: &OwnerId) -> Result<Option<CartRecord>, StoreError> {
        self.record_for_owner("carts", owner).await
    }

    /// Create a new cart record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the create fails.
    #[instrument(skip(self, record))]
    pub async fn create_cart(&self, record: &CartRecord) -> Result<CartRecord, StoreError> {
        self.post_json("/carts", record).await
    }

    /// Replace a cart record wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the replace fails; `NotFound` if the
    /// record has vanished since it was read.
    #[instrument(skip(self, record))]
    pub async fn replace_cart(
        &self,
        id: &RecordId,
        record: &CartRecord,
    ) -> Result<CartRecord, StoreError> {
        self.put_json(&format!("/carts/{id}"), record).await
    }

    // =========================================================================
    // Wishlists
    // =========================================================================

    /// Find the wishlist record for an owner.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or answers
    /// with an error status.
    #[instrument(skip(self))]
    pub async fn find_wishlist(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<WishlistRecord>, StoreError> {
        self.record_for_owner("wishlists", owner).await
    }

    /// Create a new wishlist record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the create fails.
    #[instrument(skip(self, record))]
    pub async fn create_wishlist(
        &self,
        record: &WishlistRecord,
    ) -> Result<WishlistRecord, StoreError> {
        self.post_json("/wishlists", record).await
    }

    /// Replace a wishlist record wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the replace fails.
    #[instrument(skip(self, record))]
    pub async fn replace_wishlist(
        &self,
        id: &RecordId,
        record: &WishlistRecord,
    ) -> Result<WishlistRecord, StoreError> {
        self.put_json(&format!("/wishlists/{id}"), record).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders belonging to an owner.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or answers
    /// with an error status.
    #[instrument(skip(self))]
    pub async fn orders_for_owner(&self, owner: &OwnerId) -> Result<Vec<Order>, StoreError> {
        self.records_for_owner("orders", owner).await
    }

    /// Fetch a single order by record ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such order exists.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &RecordId) -> Result<Order, StoreError> {
        self.get_json(&format!("/orders/{id}")).await
    }

    /// Create a new order record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the create fails.
    #[instrument(skip(self, order))]
    pub async fn create_order(&self, order: &Order) -> Result<Order, StoreError> {
        self.post_json("/orders", order).await
    }

    /// Replace an order record wholesale.
    ///
    /// Cancellation is a read-overwrite-write through this method, not
    /// a server-side atomic transition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the replace fails.
    #[instrument(skip(self, order))]
    pub async fn replace_order(&self, id: &RecordId, order: &Order) -> Result<Order, StoreError> {
        self.put_json(&format!("/orders/{id}"), order).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Fetch a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such user exists.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &OwnerId) -> Result<User, StoreError> {
        self.get_json(&format!("/users/{id}")).await
    }

    /// Look up users by email.
    ///
    /// As with owner queries, the store's email filter is not trusted
    /// to be exact; callers must re-check the email on each result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(self))]
    pub async fn users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError> {
        self.get_json(&format!("/users?email={}", urlencoding::encode(email)))
            .await
    }

    /// Create a new user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the create fails.
    #[instrument(skip(self, user))]
    pub async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        self.post_json("/users", user).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.get_json("/products").await
    }

    /// Fetch a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such product exists.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.get_json(&format!("/products/{id}")).await
    }
}

/// Keep only records whose owner matches exactly.
fn filter_exact_owner<T: OwnedRecord>(records: Vec<T>, owner: &OwnerId) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| record.owner() == owner)
        .collect()
}
