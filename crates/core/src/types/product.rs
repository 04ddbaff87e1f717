//! Catalog product types.
//!
//! Products are read-only from the storefront's point of view: they are
//! sourced from the catalog collection in the resource store and never
//! written back, except as embedded copies inside wishlist records.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Currency-as-number, matching the store's JSON representation.
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Aggregate customer rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}
