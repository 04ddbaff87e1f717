//! Wishlist reconciliation engine.
//!
//! Structurally mirrors the cart engine with set semantics instead of
//! quantity accumulation, and adds the deferred-toggle protocol: a
//! toggle attempted while unauthenticated stashes the product in the
//! mirror's single pending slot and tells the caller to send the user
//! through login; the next authenticated [`WishlistEngine::load`]
//! replays the stash at most once.

use bazaar_core::{OwnerId, Product, ProductId};
use tracing::instrument;

use crate::mirror::MirrorStore;
use crate::resource::ResourceClient;
use crate::session::SessionOracle;

use super::backend::RemoteWishlist;

/// Result of a [`WishlistEngine::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The product was added to the wishlist.
    Added,
    /// The product was removed from the wishlist.
    Removed,
    /// No authenticated owner: the product is stashed as pending and
    /// the caller should navigate to the login flow with a return
    /// path. No wishlist mutation has occurred.
    LoginRequired,
}

/// Per-session wishlist state manager.
pub struct WishlistEngine<O: SessionOracle> {
    oracle: O,
    client: ResourceClient,
    mirror: MirrorStore,
    items: Vec<Product>,
    authenticated: bool,
}

impl<O: SessionOracle> WishlistEngine<O> {
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

    /// Load the wishlist for the current session.
    ///
    /// On a successful authenticated fetch this is also the
    /// authentication-detection point for the deferred-toggle
    /// protocol: a pending product is taken from its slot (clearing it
    /// unconditionally) and, if not already present, added through the
    /// normal remote path. A failed pending add is logged and dropped -
    /// at most one attempt, never an infinite retry.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        if let Some(owner) = self.oracle.current_owner().await {
            let remote = RemoteWishlist::new(self.client.clone(), owner);
            match remote.fetch().await {
                Ok(items) => {
                    self.items = items;
                    self.authenticated = true;
                    self.replay_pending(&remote).await;
                    return;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote wishlist fetch failed, using local mirror");
                }
            }
        }
        self.items = self.mirror.wishlist();
        self.authenticated = false;
    }

    /// Add a product with set semantics: adding an already-present
    /// product leaves the wishlist unchanged.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_wishlist(&mut self, product: Product) {
        match self.owner().await {
            Some(owner) => {
                let remote = RemoteWishlist::new(self.client.clone(), owner);
                match remote.add(product.clone()).await {
                    Ok(items) => self.adopt_remote(items),
                    Err(e) => {
                        tracing::warn!(error = %e, "Remote wishlist add failed, applying locally");
                        self.local_add(product);
                    }
                }
            }
            None => self.local_add(product),
        }
    }

    /// Remove a product from the wishlist, if present.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&mut self, product_id: ProductId) {
        match self.owner().await {
            Some(owner) => {
                let remote = RemoteWishlist::new(self.client.clone(), owner);
                match remote.remove(product_id).await {
                    Ok(items) => self.adopt_remote(items),
                    Err(e) => {
                        tracing::warn!(error = %e, "Remote wishlist remove failed, filtering locally");
                        self.local_remove(product_id);
                    }
                }
            }
            None => self.local_remove(product_id),
        }
    }

    /// Empty the wishlist.
    ///
    /// As with the cart, a remote failure is logged and does not block
    /// the local clear.
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&mut self) {
        if self.authenticated
            && let Some(owner) = self.owner().await
        {
            let remote = RemoteWishlist::new(self.client.clone(), owner);
            if let Err(e) = remote.clear().await {
                tracing::warn!(error = %e, "Remote wishlist clear failed; local state cleared anyway");
            }
        }

        self.items.clear();
        if let Err(e) = self.mirror.clear_wishlist() {
            tracing::warn!(error = %e, "Failed to clear mirrored wishlist");
        }
    }

    /// Toggle a product with an explicit authentication check.
    ///
    /// Identity is re-resolved through the oracle on every call - the
    /// cached flag is not trusted, since the user may have just come
    /// back from a login redirect. Unauthenticated toggles stash the
    /// product as pending (overwriting any prior stash) and mutate
    /// nothing.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn toggle(&mut self, product: Product) -> ToggleOutcome {
        let Some(owner) = self.oracle.current_owner().await else {
            if let Err(e) = self.mirror.stash_pending(product) {
                tracing::warn!(error = %e, "Failed to stash pending wishlist product");
            }
            return ToggleOutcome::LoginRequired;
        };

        // Normal toggle: add if absent, remove if present.
        if self.is_in_wishlist(product.id) {
            let remote = RemoteWishlist::new(self.client.clone(), owner);
            match remote.remove(product.id).await {
                Ok(items) => self.adopt_remote(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Remote wishlist remove failed, filtering locally");
                    self.local_remove(product.id);
                }
            }
            ToggleOutcome::Removed
        } else {
            let remote = RemoteWishlist::new(self.client.clone(), owner);
            match remote.add(product.clone()).await {
                Ok(items) => self.adopt_remote(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Remote wishlist add failed, applying locally");
                    self.local_add(product);
                }
            }
            ToggleOutcome::Added
        }
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    /// Current wishlist products.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Whether the last storage interaction went through the remote
    /// record.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether a product is in the wishlist.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn owner(&self) -> Option<OwnerId> {
        self.oracle.current_owner().await
    }

    /// Apply a stashed pending product after authentication detection.
    ///
    /// The slot is cleared before the add is attempted; the attempt
    /// itself is best-effort.
    async fn replay_pending(&mut self, remote: &RemoteWishlist) {
        let pending = match self.mirror.take_pending() {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read pending wishlist slot");
                return;
            }
        };
        let Some(product) = pending else { return };

        if self.is_in_wishlist(product.id) {
            return;
        }

        match remote.add(product.clone()).await {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::warn!(
                    product_id = %product.id,
                    error = %e,
                    "Deferred wishlist add failed; pending slot already cleared"
                );
            }
        }
    }

    fn adopt_remote(&mut self, items: Vec<Product>) {
        self.items = items;
        self.authenticated = true;
    }

    fn local_add(&mut self, product: Product) {
        if !self.is_in_wishlist(product.id) {
            self.items.push(product);
        }
        self.persist_local();
    }

    fn local_remove(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.id != product_id);
        self.persist_local();
    }

    fn persist_local(&mut self) {
        if let Err(e) = self.mirror.set_wishlist(&self.items) {
            tracing::warn!(error = %e, "Failed to persist wishlist to local mirror");
        }
        self.authenticated = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::StaticOracle;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("product {id}"),
            price: 10.0,
            image: String::new(),
            category: String::new(),
            description: None,
            rating: None,
        }
    }

    fn unreachable_client() -> ResourceClient {
        ResourceClient::new("http://127.0.0.1:1")
    }

    fn anonymous_engine(mirror: MirrorStore) -> WishlistEngine<StaticOracle> {
        WishlistEngine::new(StaticOracle::anonymous(), unreachable_client(), mirror)
    }

    #[tokio::test]
    async fn duplicate_add_leaves_size_unchanged() {
        let mut engine = anonymous_engine(MirrorStore::in_memory());
        engine.load().await;

        engine.add_to_wishlist(product(1)).await;
        engine.add_to_wishlist(product(1)).await;

        assert_eq!(engine.total_items(), 1);
        assert!(engine.is_in_wishlist(ProductId::new(1)));
    }

    #[tokio::test]
    async fn anonymous_toggle_stashes_pending_and_mutates_nothing() {
        let mirror = MirrorStore::in_memory();
        let mut engine = anonymous_engine(mirror.clone());
        engine.load().await;

        let outcome = engine.toggle(product(1)).await;

        assert_eq!(outcome, ToggleOutcome::LoginRequired);
        assert_eq!(engine.total_items(), 0);
        assert_eq!(mirror.peek_pending().unwrap().id, ProductId::new(1));
    }

    #[tokio::test]
    async fn second_anonymous_toggle_overwrites_pending() {
        let mirror = MirrorStore::in_memory();
        let mut engine = anonymous_engine(mirror.clone());
        engine.load().await;

        engine.toggle(product(1)).await;
        engine.toggle(product(2)).await;

        // At most one pending product survives.
        assert_eq!(mirror.peek_pending().unwrap().id, ProductId::new(2));
    }

    #[tokio::test]
    async fn anonymous_state_round_trips_through_mirror() {
        let mirror = MirrorStore::in_memory();
        let mut engine = anonymous_engine(mirror.clone());
        engine.load().await;
        engine.add_to_wishlist(product(3)).await;

        let mut second = anonymous_engine(mirror);
        second.load().await;
        assert!(second.is_in_wishlist(ProductId::new(3)));
        assert!(!second.is_authenticated());
    }

    #[tokio::test]
    async fn remove_is_keyed_by_product_id() {
        let mut engine = anonymous_engine(MirrorStore::in_memory());
        engine.load().await;
        engine.add_to_wishlist(product(1)).await;
        engine.add_to_wishlist(product(2)).await;

        engine.remove_from_wishlist(ProductId::new(1)).await;

        assert!(!engine.is_in_wishlist(ProductId::new(1)));
        assert!(engine.is_in_wishlist(ProductId::new(2)));
        assert_eq!(engine.total_items(), 1);
    }
}
