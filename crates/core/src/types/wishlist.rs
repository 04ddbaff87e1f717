//! Wishlist records.
//!
//! Unlike carts, wishlists have set semantics keyed by product ID:
//! adding an already-present product is a no-op, not an error and not
//! an append.

use serde::{Deserialize, Serialize};

use super::id::{OwnerId, ProductId, RecordId};
use super::product::Product;

/// A per-owner wishlist record as persisted in the resource store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistRecord {
    /// Store-assigned ID; absent until the record is first created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub items: Vec<Product>,
}

impl WishlistRecord {
    /// Create an empty, not-yet-persisted record for an owner.
    #[must_use]
    pub const fn new(owner: OwnerId) -> Self {
        Self {
            id: None,
            owner,
            items: Vec::new(),
        }
    }

    /// Whether the wishlist contains a product.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Add a product, rejecting duplicates.
    ///
    /// Returns `false` (and leaves the record untouched) if a product
    /// with the same ID is already present.
    pub fn add_product(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Remove a product by ID, if present.
    pub fn remove_product(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.id != product_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn duplicate_add_leaves_size_unchanged() {
        let mut record = WishlistRecord::new(OwnerId::new("1"));
        assert!(record.add_product(product(1)));
        assert!(!record.add_product(product(1)));
        assert_eq!(record.items.len(), 1);
    }

    #[test]
    fn remove_is_keyed_by_product_id() {
        let mut record = WishlistRecord::new(OwnerId::new("1"));
        record.add_product(product(1));
        record.add_product(product(2));
        record.remove_product(ProductId::new(1));
        assert!(!record.contains(ProductId::new(1)));
        assert!(record.contains(ProductId::new(2)));
    }
}
