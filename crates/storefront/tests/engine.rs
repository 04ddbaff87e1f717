//! Reconciliation engine tests against a live (in-process) store.
//!
//! The unit tests inside the crate cover the anonymous paths; these
//! cover the authenticated paths end to end, the deferred wishlist
//! replay, and the documented last-write-wins limitation of the
//! store's read-modify-write sequences.

#![allow(clippy::unwrap_used)]

mod common;

use serde_json::json;

use bazaar_core::{CartProduct, OwnerId, Product, ProductId};
use bazaar_storefront::engine::{CartEngine, RemoteCart, ToggleOutcome, WishlistEngine};
use bazaar_storefront::mirror::MirrorStore;
use bazaar_storefront::resource::ResourceClient;
use bazaar_storefront::session::{CookieOracle, SessionOracle, StaticOracle};

use common::{FakeStore, spawn_store, user_json};

fn product(id: i64, price: f64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("product {id}"),
        price,
        image: String::new(),
        category: String::new(),
        description: None,
        rating: None,
    }
}

/// Store with one user; returns (store, client, owner).
async fn store_with_user() -> (FakeStore, ResourceClient, OwnerId) {
    let store = spawn_store().await;
    let id = store
        .insert("users", user_json("ada@example.com", "pw"))
        .await;
    let client = ResourceClient::new(&store.base_url());
    (store, client, OwnerId::new(id.to_string()))
}

// ============================================================================
// Authenticated cart paths
// ============================================================================

#[tokio::test]
async fn first_authenticated_add_creates_the_record() {
    let (store, client, owner) = store_with_user().await;
    let mut engine = CartEngine::new(
        StaticOracle::authenticated(owner.clone()),
        client,
        MirrorStore::in_memory(),
    );
    engine.load().await;
    assert!(engine.is_authenticated());
    assert!(store.records("carts").await.is_empty());

    engine.add_to_cart(&product(1, 100.0)).await;

    assert!(engine.is_authenticated());
    let carts = store.records("carts").await;
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0]["userId"], json!(owner.as_str()));
    assert_eq!(carts[0]["items"][0]["quantity"], 1);

    // The mirror is untouched on the authenticated path.
    assert_eq!(engine.items().len(), 1);
}

#[tokio::test]
async fn authenticated_mutations_rewrite_one_record() {
    let (store, client, owner) = store_with_user().await;
    let mut engine = CartEngine::new(
        StaticOracle::authenticated(owner),
        client,
        MirrorStore::in_memory(),
    );
    engine.load().await;

    engine.add_to_cart(&product(1, 100.0)).await;
    engine.add_to_cart(&product(1, 100.0)).await;
    engine.add_to_cart(&product(2, 50.0)).await;
    engine.update_quantity(ProductId::new(2), 4).await;
    engine.remove_from_cart(ProductId::new(1)).await;

    let carts = store.records("carts").await;
    assert_eq!(carts.len(), 1);
    let items = carts[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 2);
    assert_eq!(items[0]["quantity"], 4);
    assert_eq!(engine.total_items(), 4);
}

#[tokio::test]
async fn remove_without_a_record_is_an_empty_cart() {
    let (_store, client, owner) = store_with_user().await;
    let remote = RemoteCart::new(client, owner);
    let items = remote.remove(ProductId::new(1)).await.unwrap();
    assert!(items.is_empty());
}

// ============================================================================
// Deferred wishlist replay
// ============================================================================

#[tokio::test]
async fn pending_product_is_applied_once_after_login() {
    let (store, client, owner) = store_with_user().await;
    let mirror = MirrorStore::in_memory();

    // Anonymous toggle stashes and asks for login.
    let mut anon = WishlistEngine::new(StaticOracle::anonymous(), client.clone(), mirror.clone());
    anon.load().await;
    assert_eq!(anon.toggle(product(1, 10.0)).await, ToggleOutcome::LoginRequired);
    assert!(store.records("wishlists").await.is_empty());

    // Authenticated load replays the stash.
    let mut engine = WishlistEngine::new(
        StaticOracle::authenticated(owner),
        client,
        mirror.clone(),
    );
    engine.load().await;

    assert!(engine.is_in_wishlist(ProductId::new(1)));
    assert_eq!(store.records("wishlists").await.len(), 1);
    assert!(mirror.peek_pending().is_none());

    // A second load does not apply it again.
    engine.load().await;
    assert_eq!(engine.total_items(), 1);
}

#[tokio::test]
async fn pending_slot_clears_even_when_product_is_already_wishlisted() {
    let (store, client, owner) = store_with_user().await;
    let mirror = MirrorStore::in_memory();

    let mut engine = WishlistEngine::new(
        StaticOracle::authenticated(owner),
        client,
        mirror.clone(),
    );
    engine.load().await;
    engine.add_to_wishlist(product(1, 10.0)).await;

    mirror.stash_pending(product(1, 10.0)).unwrap();
    engine.load().await;

    assert_eq!(engine.total_items(), 1);
    assert!(mirror.peek_pending().is_none());
    // Still a single record with a single item.
    let wishlists = store.records("wishlists").await;
    assert_eq!(wishlists.len(), 1);
    assert_eq!(wishlists[0]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn authenticated_toggle_adds_then_removes() {
    let (_store, client, owner) = store_with_user().await;
    let mut engine = WishlistEngine::new(
        StaticOracle::authenticated(owner),
        client,
        MirrorStore::in_memory(),
    );
    engine.load().await;

    assert_eq!(engine.toggle(product(1, 10.0)).await, ToggleOutcome::Added);
    assert!(engine.is_in_wishlist(ProductId::new(1)));
    assert_eq!(engine.toggle(product(1, 10.0)).await, ToggleOutcome::Removed);
    assert!(!engine.is_in_wishlist(ProductId::new(1)));
}

// ============================================================================
// Session oracle
// ============================================================================

#[tokio::test]
async fn cookie_oracle_verifies_against_the_store() {
    let (_store, client, owner) = store_with_user().await;

    let oracle = CookieOracle::new(client.clone(), Some(owner.clone()));
    assert_eq!(oracle.current_owner().await, Some(owner));

    let oracle = CookieOracle::new(client, Some(OwnerId::new("999")));
    assert_eq!(oracle.current_owner().await, None);
}

// ============================================================================
// Documented limitation: interleaved read-modify-write loses an update
// ============================================================================

#[tokio::test]
async fn interleaved_record_rewrites_are_last_write_wins() {
    let (store, client, owner) = store_with_user().await;

    // Seed a cart with one unit of product 1.
    let remote = RemoteCart::new(client.clone(), owner.clone());
    remote
        .add(CartProduct::from(&product(1, 100.0)), 1)
        .await
        .unwrap();

    // Two writers both read the same snapshot...
    let mut first = client.find_cart(&owner).await.unwrap().unwrap();
    let mut second = client.find_cart(&owner).await.unwrap().unwrap();

    // ...and each merge one more unit before writing back.
    first.merge_line(CartProduct::from(&product(1, 100.0)), 1);
    let first_id = first.id.clone().unwrap();
    client.replace_cart(&first_id, &first).await.unwrap();

    second.merge_line(CartProduct::from(&product(1, 100.0)), 1);
    let second_id = second.id.clone().unwrap();
    client.replace_cart(&second_id, &second).await.unwrap();

    // Three increments happened; only two survive.
    let carts = store.records("carts").await;
    assert_eq!(carts[0]["items"][0]["quantity"], 2);
}
