//! Local mirror store for anonymous sessions.
//!
//! A durable key-value mirror of the cart and wishlist, used only while
//! no authenticated owner is known, plus the reserved single slot for a
//! wishlist add deferred across login. The mirror is a passive backend:
//! it holds whatever was last written, with no merging of its own.
//!
//! The mirror is shared across everything running against the same
//! backing file, with no cross-process locking; last write wins there
//! too.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::{CartLine, Product};

/// Errors that can occur persisting the mirror file.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape of the mirror.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct MirrorData {
    #[serde(default)]
    cart: Vec<CartLine>,
    #[serde(default)]
    wishlist: Vec<Product>,
    /// The reserved pending slot: a wishlist add attempted while
    /// unauthenticated, held until the next authentication detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending_wishlist: Option<Product>,
}

/// Durable key-value mirror for the cart and wishlist.
///
/// Cheaply cloneable; all clones share the same state and backing file.
#[derive(Debug, Clone)]
pub struct MirrorStore {
    inner: Arc<Mutex<MirrorInner>>,
}

#[derive(Debug)]
struct MirrorInner {
    path: Option<PathBuf>,
    data: MirrorData,
}

impl MirrorStore {
    /// Open a mirror backed by a file, or purely in memory when `path`
    /// is `None`.
    ///
    /// A missing file starts empty; an unreadable or corrupt file is
    /// logged and treated as empty rather than failing startup.
    #[must_use]
    pub fn open(path: Option<PathBuf>) -> Self {
        let data = path.as_ref().map_or_else(MirrorData::default, |p| {
            match std::fs::read_to_string(p) {
                Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    tracing::warn!(path = %p.display(), error = %e, "Corrupt mirror file, starting empty");
                    MirrorData::default()
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => MirrorData::default(),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "Unreadable mirror file, starting empty");
                    MirrorData::default()
                }
            }
        });

        Self {
            inner: Arc::new(Mutex::new(MirrorInner { path, data })),
        }
    }

    /// Open an in-memory mirror (no backing file).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(None)
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut MirrorInner) -> T) -> T {
        // A poisoned lock means another thread panicked mid-write; the
        // data itself is still a complete last-written snapshot.
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut inner)
    }

    fn mutate(&self, f: impl FnOnce(&mut MirrorData)) -> Result<(), MirrorError> {
        self.with_inner(|inner| {
            f(&mut inner.data);
            persist(inner)
        })
    }

    // =========================================================================
    // Cart slot
    // =========================================================================

    /// Read the mirrored cart (empty if never written).
    #[must_use]
    pub fn cart(&self) -> Vec<CartLine> {
        self.with_inner(|inner| inner.data.cart.clone())
    }

    /// Overwrite the mirrored cart.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if the backing file cannot be written.
    pub fn set_cart(&self, items: &[CartLine]) -> Result<(), MirrorError> {
        self.mutate(|data| data.cart = items.to_vec())
    }

    /// Clear the mirrored cart slot.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if the backing file cannot be written.
    pub fn clear_cart(&self) -> Result<(), MirrorError> {
        self.mutate(|data| data.cart.clear())
    }

    // =========================================================================
    // Wishlist slot
    // =========================================================================

    /// Read the mirrored wishlist (empty if never written).
    #[must_use]
    pub fn wishlist(&self) -> Vec<Product> {
        self.with_inner(|inner| inner.data.wishlist.clone())
    }

    /// Overwrite the mirrored wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if the backing file cannot be written.
    pub fn set_wishlist(&self, items: &[Product]) -> Result<(), MirrorError> {
        self.mutate(|data| data.wishlist = items.to_vec())
    }

    /// Clear the mirrored wishlist slot.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if the backing file cannot be written.
    pub fn clear_wishlist(&self) -> Result<(), MirrorError> {
        self.mutate(|data| data.wishlist.clear())
    }

    // =========================================================================
    // Pending wishlist slot (single-slot outbox)
    // =========================================================================

    /// Stash a product as the pending wishlist add, overwriting any
    /// prior value. At most one pending product survives at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if the backing file cannot be written.
    pub fn stash_pending(&self, product: Product) -> Result<(), MirrorError> {
        self.mutate(|data| data.pending_wishlist = Some(product))
    }

    /// Take the pending product, clearing the slot.
    ///
    /// This is the consume half of the outbox: the slot is emptied on
    /// read so a pending add is attempted at most once, regardless of
    /// whether that attempt later succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if the backing file cannot be written.
    pub fn take_pending(&self) -> Result<Option<Product>, MirrorError> {
        self.with_inner(|inner| {
            let taken = inner.data.pending_wishlist.take();
            persist(inner)?;
            Ok(taken)
        })
    }

    /// Inspect the pending slot without consuming it.
    #[must_use]
    pub fn peek_pending(&self) -> Option<Product> {
        self.with_inner(|inner| inner.data.pending_wishlist.clone())
    }
}

/// Write the current data through to the backing file, if any.
fn persist(inner: &MirrorInner) -> Result<(), MirrorError> {
    if let Some(path) = &inner.path {
        let raw = serde_json::to_string_pretty(&inner.data)?;
        std::fs::write(path, raw)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::ProductId;

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

    fn line(id: i64, quantity: u32) -> CartLine {
        CartLine {
            id: ProductId::new(id),
            title: format!("product {id}"),
            price: 100.0,
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn slots_start_empty() {
        let mirror = MirrorStore::in_memory();
        assert!(mirror.cart().is_empty());
        assert!(mirror.wishlist().is_empty());
        assert!(mirror.peek_pending().is_none());
    }

    #[test]
    fn cart_slot_is_overwritten_not_merged() {
        let mirror = MirrorStore::in_memory();
        mirror.set_cart(&[line(1, 2), line(2, 1)]).unwrap();
        mirror.set_cart(&[line(3, 1)]).unwrap();
        let cart = mirror.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].id, ProductId::new(3));
    }

    #[test]
    fn stash_overwrites_prior_pending() {
        let mirror = MirrorStore::in_memory();
        mirror.stash_pending(product(1)).unwrap();
        mirror.stash_pending(product(2)).unwrap();
        assert_eq!(mirror.peek_pending().unwrap().id, ProductId::new(2));
    }

    #[test]
    fn take_pending_consumes_exactly_once() {
        let mirror = MirrorStore::in_memory();
        mirror.stash_pending(product(1)).unwrap();
        assert!(mirror.take_pending().unwrap().is_some());
        assert!(mirror.take_pending().unwrap().is_none());
        assert!(mirror.peek_pending().is_none());
    }

    #[test]
    fn file_backed_mirror_survives_reopen() {
        let path = std::env::temp_dir().join(format!("bazaar-mirror-{}.json", uuid::Uuid::new_v4()));

        let mirror = MirrorStore::open(Some(path.clone()));
        mirror.set_cart(&[line(1, 2)]).unwrap();
        mirror.stash_pending(product(5)).unwrap();
        drop(mirror);

        let reopened = MirrorStore::open(Some(path.clone()));
        assert_eq!(reopened.cart().len(), 1);
        assert_eq!(reopened.peek_pending().unwrap().id, ProductId::new(5));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let path = std::env::temp_dir().join(format!("bazaar-mirror-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();

        let mirror = MirrorStore::open(Some(path.clone()));
        assert!(mirror.cart().is_empty());

        std::fs::remove_file(path).unwrap();
    }
}
