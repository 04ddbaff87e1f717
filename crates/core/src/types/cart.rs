//! Cart records and lines.
//!
//! One `CartRecord` per owner in the resource store. The store does not
//! enforce owner uniqueness, so callers must search-then-create; the
//! merge helpers here are the single implementation of the line-level
//! read-modify-write used by both the remote and local storage paths.

use serde::{Deserialize, Serialize};

use super::id::{OwnerId, ProductId, RecordId};
use super::product::Product;

/// The product fields captured into a cart line.
///
/// This is the subset of [`Product`] that clients send when adding to
/// the cart; category, description and rating are not carried along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// A single line in a cart.
///
/// Invariant: `quantity >= 1`. A line whose quantity would reach zero
/// is deleted, never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// Create a line from a cart product and quantity.
    #[must_use]
    pub fn new(product: CartProduct, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity,
        }
    }

    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A per-owner cart record as persisted in the resource store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Store-assigned ID; absent until the record is first created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub items: Vec<CartLine>,
}

impl CartRecord {
    /// Create an empty, not-yet-persisted record for an owner.
    #[must_use]
    pub const fn new(owner: OwnerId) -> Self {
        Self {
            id: None,
            owner,
            items: Vec::new(),
        }
    }

    /// Increment the matching line's quantity, or append a new line.
    pub fn merge_line(&mut self, product: CartProduct, quantity: u32) {
        merge_line(&mut self.items, product, quantity);
    }

    /// Overwrite the quantity of the matching line, if present.
    pub fn set_line_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        set_line_quantity(&mut self.items, product_id, quantity)
    }

    /// Delete the matching line, if present.
    pub fn remove_line(&mut self, product_id: ProductId) {
        remove_line(&mut self.items, product_id);
    }
}

// The line-merge functions below are the single implementation of the
// cart's read-modify-write semantics. Both storage paths (the remote
// record rewrite and the in-memory/local-mirror merge) go through them,
// so the net effect of a mutation is identical regardless of path.

/// Increment the matching line's quantity, or append a new line.
pub fn merge_line(items: &mut Vec<CartLine>, product: CartProduct, quantity: u32) {
    if let Some(line) = items.iter_mut().find(|line| line.id == product.id) {
        line.quantity += quantity;
    } else {
        items.push(CartLine::new(product, quantity));
    }
}

/// Overwrite the quantity of the matching line, if present.
///
/// Returns `true` if a line matched. Callers are responsible for
/// routing zero quantities through [`remove_line`] instead; no upper
/// bound is enforced at this layer.
pub fn set_line_quantity(items: &mut [CartLine], product_id: ProductId, quantity: u32) -> bool {
    match items.iter_mut().find(|line| line.id == product_id) {
        Some(line) => {
            line.quantity = quantity;
            true
        }
        None => false,
    }
}

/// Delete the matching line, if present.
pub fn remove_line(items: &mut Vec<CartLine>, product_id: ProductId) {
    items.retain(|line| line.id != product_id);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            title: format!("product {id}"),
            price,
            image: String::new(),
        }
    }

    #[test]
    fn merge_increments_existing_line() {
        let mut record = CartRecord::new(OwnerId::new("1"));
        record.merge_line(product(1, 100.0), 1);
        record.merge_line(product(1, 100.0), 1);
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, 2);
    }

    #[test]
    fn merge_appends_new_line() {
        let mut record = CartRecord::new(OwnerId::new("1"));
        record.merge_line(product(1, 100.0), 1);
        record.merge_line(product(2, 50.0), 3);
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[1].quantity, 3);
    }

    #[test]
    fn set_quantity_misses_unknown_line() {
        let mut record = CartRecord::new(OwnerId::new("1"));
        record.merge_line(product(1, 100.0), 1);
        assert!(record.set_line_quantity(ProductId::new(1), 5));
        assert!(!record.set_line_quantity(ProductId::new(9), 5));
        assert_eq!(record.items[0].quantity, 5);
    }

    #[test]
    fn remove_line_is_a_filter() {
        let mut record = CartRecord::new(OwnerId::new("1"));
        record.merge_line(product(1, 100.0), 1);
        record.remove_line(ProductId::new(1));
        record.remove_line(ProductId::new(1));
        assert!(record.items.is_empty());
    }

    #[test]
    fn record_id_omitted_until_persisted() {
        let record = CartRecord::new(OwnerId::new("1"));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["userId"], "1");
    }
}
