//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across the Bazaar storefront:
//! the wire-level records stored in the external resource store (carts,
//! wishlists, orders, users, products) and the type-safe IDs linking
//! them together.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The
//! record shapes here match the JSON documents the resource store
//! persists, so they double as the wire contract for the storefront's
//! REST client.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, domain records, and the order status machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
