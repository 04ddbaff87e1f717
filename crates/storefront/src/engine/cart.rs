//! Cart reconciliation engine.
//!
//! Owns the authoritative in-memory cart for the current page session.
//! Every mutation first asks the session oracle for identity, then
//! routes to the remote record (authenticated) or the in-memory view
//! persisted through the local mirror (anonymous). The caller-visible
//! net effect - an updated line list - is identical on both paths.

use bazaar_core::types::cart::{merge_line, remove_line, set_line_quantity};
use bazaar_core::{CartLine, CartProduct, OwnerId, Product, ProductId};
use tracing::instrument;

use crate::mirror::MirrorStore;
use crate::resource::ResourceClient;
use crate::session::SessionOracle;

use super::backend::RemoteCart;

/// Per-session cart state manager.
pub struct CartEngine<O: SessionOracle> {
    oracle: O,
    client: ResourceClient,
    mirror: MirrorStore,
    items: Vec<CartLine>,
    authenticated: bool,
}

impl<O: SessionOracle> CartEngine<O> {
    /// Create an engine with no loaded state.
    ///
    /// Call [`Self::load`] before reading derived values.
    #[must_use]
    pub const fn new(oracle: O, client: ResourceClient, mirror: MirrorStore) -> Self {
        Self {
            oracle,
            client,
            mirror,
            items: Vec::new(),
            authenticated: false,
        }
    }

    /// Load the cart for the current session.
    ///
    /// Attempts the remote fetch first; on success the engine enters
    /// authenticated mode. Any failure - no session, unknown user,
    /// store unreachable - falls back to the mirror's cart slot and
    /// anonymous mode. Idempotent and safe to repeat.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        if let Some(owner) = self.oracle.current_owner().await {
            match RemoteCart::new(self.client.clone(), owner).fetch().await {
                Ok(items) => {
                    self.items = items;
                    self.authenticated = true;
                    return;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote cart fetch failed, using local mirror");
                }
            }
        }
        self.items = self.mirror.cart();
        self.authenticated = false;
    }

    /// Add one unit of a product to the cart.
    ///
    /// Remote path: locate-or-create the record, locate-or-increment
    /// the line, write the record back, adopt the server's lines. If
    /// any step fails the same merge is applied in memory and persisted
    /// to the mirror instead, and the engine drops to anonymous mode.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&mut self, product: &Product) {
        let cart_product = CartProduct::from(product);
        match self.owner().await {
            Some(owner) => {
                let remote = RemoteCart::new(self.client.clone(), owner);
                match remote.add(cart_product.clone(), 1).await {
                    Ok(items) => self.adopt_remote(items),
                    Err(e) => {
                        tracing::warn!(error = %e, "Remote cart add failed, merging locally");
                        self.local_merge(cart_product, 1);
                    }
                }
            }
            None => self.local_merge(cart_product, 1),
        }
    }

    /// Remove a product's line entirely.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&mut self, product_id: ProductId) {
        match self.owner().await {
            Some(owner) => {
                let remote = RemoteCart::new(self.client.clone(), owner);
                match remote.remove(product_id).await {
                    Ok(items) => self.adopt_remote(items),
                    Err(e) => {
                        tracing::warn!(error = %e, "Remote cart remove failed, filtering locally");
                        self.local_remove(product_id);
                    }
                }
            }
            None => self.local_remove(product_id),
        }
    }

    /// Overwrite a line's quantity.
    ///
    /// A quantity of zero is defined to be equivalent to
    /// [`Self::remove_from_cart`]. No upper bound is enforced at this
    /// layer.
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_cart(product_id).await;
            return;
        }

        match self.owner().await {
            Some(owner) => {
                let remote = RemoteCart::new(self.client.clone(), owner);
                match remote.set_quantity(product_id, quantity).await {
                    Ok(items) => self.adopt_remote(items),
                    Err(e) => {
                        tracing::warn!(error = %e, "Remote quantity update failed, applying locally");
                        self.local_set_quantity(product_id, quantity);
                    }
                }
            }
            None => self.local_set_quantity(product_id, quantity),
        }
    }

    /// Empty the cart.
    ///
    /// A remote delete-all failure is logged, not retried, and does not
    /// block the local clear: the cart empties for the caller even if
    /// the remote record still holds lines. Accepted inconsistency.
    #[instrument(skip(self))]
    pub async fn clear_cart(&mut self) {
        if self.authenticated
            && let Some(owner) = self.owner().await
        {
            let remote = RemoteCart::new(self.client.clone(), owner);
            if let Err(e) = remote.clear().await {
                tracing::warn!(error = %e, "Remote cart clear failed; local state cleared anyway");
            }
        }

        self.items.clear();
        if let Err(e) = self.mirror.clear_cart() {
            tracing::warn!(error = %e, "Failed to clear mirrored cart");
        }
    }

    // =========================================================================
    // Derived queries (pure, recomputed on every call)
    // =========================================================================

    /// Current cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Whether the last storage interaction went through the remote
    /// record.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Whether a product has a line in the cart.
    #[must_use]
    pub fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|line| line.id == product_id)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn owner(&self) -> Option<OwnerId> {
        self.oracle.current_owner().await
    }

    fn adopt_remote(&mut self, items: Vec<CartLine>) {
        self.items = items;
        self.authenticated = true;
    }

    fn local_merge(&mut self, product: CartProduct, quantity: u32) {
        merge_line(&mut self.items, product, quantity);
        self.persist_local();
    }

    fn local_remove(&mut self, product_id: ProductId) {
        remove_line(&mut self.items, product_id);
        self.persist_local();
    }

    fn local_set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        set_line_quantity(&mut self.items, product_id, quantity);
        self.persist_local();
    }

    fn persist_local(&mut self) {
        if let Err(e) = self.mirror.set_cart(&self.items) {
            tracing::warn!(error = %e, "Failed to persist cart to local mirror");
        }
        self.authenticated = false;
    }
}
