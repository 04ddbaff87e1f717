//! Cart and wishlist reconciliation engines.
//!
//! Each engine owns the authoritative in-memory view of its collection
//! for the lifetime of a page session and decides, per mutation, which
//! storage substrate serves it:
//!
//! - authenticated: the per-user record in the external resource store,
//!   via [`backend::RemoteCart`] / [`backend::RemoteWishlist`];
//! - anonymous: the in-memory view persisted through the
//!   [`crate::mirror::MirrorStore`].
//!
//! Backend selection is an explicit authentication check against the
//! injected [`crate::session::SessionOracle`], never exception-driven
//! control flow: "anonymous user" is an expected state. A failing
//! remote call during a mutation is the one deliberate downgrade - the
//! merge is replayed in memory, persisted to the mirror, and the engine
//! drops to anonymous mode; the caller sees an updated view either way.
//!
//! The wishlist engine additionally carries the deferred-toggle
//! protocol: an unauthenticated toggle stashes the product in the
//! mirror's single pending slot, and the next authenticated load
//! replays it at most once.

pub mod backend;
pub mod cart;
pub mod wishlist;

pub use backend::{RemoteCart, RemoteWishlist};
pub use cart::CartEngine;
pub use wishlist::{ToggleOutcome, WishlistEngine};
