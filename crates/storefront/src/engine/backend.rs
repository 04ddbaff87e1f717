//! Remote storage backends for one owner's cart and wishlist.
//!
//! Each mutation is a search-then-create or read-modify-write sequence
//! of serial store calls with no locking; two concurrent mutations
//! against the same owner can interleave and lose an update
//! (last-write-wins on the final replace). This is an accepted
//! limitation of the backing store, documented and observable in tests
//! rather than hidden here.
//!
//! Both the HTTP cart/wishlist routes and the reconciliation engines'
//! authenticated paths run through these backends, so there is exactly
//! one implementation of the record-rewrite sequences.

use bazaar_core::{CartLine, CartProduct, CartRecord, OwnerId, Product, ProductId, WishlistRecord};

use crate::resource::{ResourceClient, StoreError};

/// Remote cart backend scoped to a single owner.
#[derive(Debug, Clone)]
pub struct RemoteCart {
    client: ResourceClient,
    owner: OwnerId,
}

impl RemoteCart {
    /// Create a backend for an owner.
    #[must_use]
    pub const fn new(client: ResourceClient, owner: OwnerId) -> Self {
        Self { client, owner }
    }

    /// Fetch the owner's cart lines; an owner with no record has an
    /// empty cart, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or erroring.
    pub async fn fetch(&self) -> Result<Vec<CartLine>, StoreError> {
        Ok(self
            .client
            .find_cart(&self.owner)
            .await?
            .map(|record| record.items)
            .unwrap_or_default())
    }

    /// Locate-or-create the owner's record, then locate-or-increment
    /// the matching line (or append with the given quantity), and write
    /// the full record back. Returns the server's adopted lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any of the serial calls fails.
    pub async fn add(
        &self,
        product: CartProduct,
        quantity: u32,
    ) -> Result<Vec<CartLine>, StoreError> {
        match self.client.find_cart(&self.owner).await? {
            None => {
                let mut record = CartRecord::new(self.owner.clone());
                record.merge_line(product, quantity);
                let created = self.client.create_cart(&record).await?;
                Ok(created.items)
            }
            Some(mut record) => {
                record.merge_line(product, quantity);
                self.replace(record).await
            }
        }
    }

    /// Overwrite the quantity of a line. Zero deletes the line; a
    /// missing line leaves the record unchanged but still rewrites it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the owner has no cart
    /// record, or any other [`StoreError`] on store failure.
    pub async fn set_quantity(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, StoreError> {
        let mut record = self
            .client
            .find_cart(&self.owner)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("cart for owner {}", self.owner)))?;

        if quantity == 0 {
            record.remove_line(product_id);
        } else {
            record.set_line_quantity(product_id, quantity);
        }
        self.replace(record).await
    }

    /// Delete the matching line and rewrite the record. An owner with
    /// no record gets an empty cart back, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or erroring.
    pub async fn remove(&self, product_id: ProductId) -> Result<Vec<CartLine>, StoreError> {
        let Some(mut record) = self.client.find_cart(&self.owner).await? else {
            return Ok(Vec::new());
        };
        record.remove_line(product_id);
        self.replace(record).await
    }

    /// Empty the owner's cart record, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or erroring.
    pub async fn clear(&self) -> Result<Vec<CartLine>, StoreError> {
        let Some(mut record) = self.client.find_cart(&self.owner).await? else {
            return Ok(Vec::new());
        };
        record.items.clear();
        self.replace(record).await
    }

    async fn replace(&self, record: CartRecord) -> Result<Vec<CartLine>, StoreError> {
        let id = record
            .id
            .clone()
            .ok_or_else(|| StoreError::NotFound(format!("cart record id for {}", self.owner)))?;
        let updated = self.client.replace_cart(&id, &record).await?;
        Ok(updated.items)
    }
}

/// Remote wishlist backend scoped to a single owner.
#[derive(Debug, Clone)]
pub struct RemoteWishlist {
    client: ResourceClient,
    owner: OwnerId,
}

impl RemoteWishlist {
    /// Create a backend for an owner.
    #[must_use]
    pub const fn new(client: ResourceClient, owner: OwnerId) -> Self {
        Self { client, owner }
    }

    /// Fetch the owner's wishlist; no record means an empty wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or erroring.
    pub async fn fetch(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .client
            .find_wishlist(&self.owner)
            .await?
            .map(|record| record.items)
            .unwrap_or_default())
    }

    /// Add a product with set semantics: a duplicate is a no-op that
    /// returns the unchanged wishlist without a write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any of the serial calls fails.
    pub async fn add(&self, product: Product) -> Result<Vec<Product>, StoreError> {
        match self.client.find_wishlist(&self.owner).await? {
            None => {
                let mut record = WishlistRecord::new(self.owner.clone());
                record.add_product(product);
                let created = self.client.create_wishlist(&record).await?;
                Ok(created.items)
            }
            Some(mut record) => {
                if !record.add_product(product) {
                    // Already present; skip the rewrite entirely.
                    return Ok(record.items);
                }
                self.replace(record).await
            }
        }
    }

    /// Remove a product and rewrite the record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the owner has no wishlist
    /// record, or any other [`StoreError`] on store failure.
    pub async fn remove(&self, product_id: ProductId) -> Result<Vec<Product>, StoreError> {
        let mut record = self
            .client
            .find_wishlist(&self.owner)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("wishlist for owner {}", self.owner)))?;
        record.remove_product(product_id);
        self.replace(record).await
    }

    /// Empty the owner's wishlist record, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable or erroring.
    pub async fn clear(&self) -> Result<Vec<Product>, StoreError> {
        let Some(mut record) = self.client.find_wishlist(&self.owner).await? else {
            return Ok(Vec::new());
        };
        record.items.clear();
        self.replace(record).await
    }

    async fn replace(&self, record: WishlistRecord) -> Result<Vec<Product>, StoreError> {
        let id = record.id.clone().ok_or_else(|| {
            StoreError::NotFound(format!("wishlist record id for {}", self.owner))
        })?;
        let updated = self.client.replace_wishlist(&id, &record).await?;
        Ok(updated.items)
    }
}
