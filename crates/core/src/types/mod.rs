//! Core types for the Bazaar storefront.
//!
//! This module provides type-safe wrappers for common domain concepts
//! and the record shapes persisted in the external resource store.

pub mod cart;
pub mod id;
pub mod order;
pub mod product;
pub mod status;
pub mod user;
pub mod wishlist;

pub use cart::{CartLine, CartProduct, CartRecord};
pub use id::*;
pub use order::{NewOrder, Order};
pub use product::{Product, Rating};
pub use status::OrderStatus;
pub use user::{Address, Geolocation, User, UserName};
pub use wishlist::WishlistRecord;
