//! JSON API route handlers.
//!
//! Every response here is a JSON envelope: mutating cart and wishlist
//! handlers return `{ "success": true, "cart"/"wishlist": [...] }` on
//! success, and every error path returns `{ "error": "..." }` with the
//! matching status code (see [`crate::error::AppError`]).

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;
