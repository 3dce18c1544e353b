//! Integration tests for restoring and saving carts.
//!
//! These tests cover the storage round trip, the load fallback policy, and
//! the ordering guarantees of the background persister.

#![allow(clippy::unwrap_used)]

use pineapple_cart_core::Cart;
use pineapple_cart_integration_tests::{product, product_id, temp_dir};
use pineapple_cart_store::{
    CartStorage, CartStore, FileStorage, LoadError, LoadPolicy, MemoryStorage, PersistError,
    StoreConfig, codec,
};

const KEY: &str = "@PineappleCart:products";

fn config(load_policy: LoadPolicy) -> StoreConfig {
    StoreConfig {
        storage_key: KEY.to_string(),
        load_policy,
    }
}

// =============================================================================
// Round Trip
// =============================================================================

#[tokio::test]
async fn test_memory_round_trip() {
    let storage = MemoryStorage::new();

    let store = CartStore::load(storage.clone(), &config(LoadPolicy::Strict))
        .await
        .unwrap();
    store.add_to_cart(product("a", "Shirt", 1000));
    store.add_to_cart(product("b", "Socks", 250));
    store.add_to_cart(product("a", "Shirt", 1000));
    store.flush().await.unwrap();
    let saved = store.snapshot().cart().clone();
    store.shutdown().await;

    let restored = CartStore::load(storage, &config(LoadPolicy::Strict))
        .await
        .unwrap();

    assert_eq!(restored.snapshot().cart(), &saved);
    assert_eq!(restored.snapshot().sequence(), 0);
}

#[tokio::test]
async fn test_file_round_trip() {
    let dir = temp_dir("cart-round-trip");

    let store = CartStore::load(FileStorage::new(&dir), &config(LoadPolicy::Strict))
        .await
        .unwrap();
    store.add_to_cart(product("x", "Hat", 500));
    store.add_to_cart(product("y", "Scarf", 1250));
    store.increment(&product_id("x"));
    store.flush().await.unwrap();
    let saved = store.snapshot().cart().clone();
    store.shutdown().await;

    let restored = CartStore::load(FileStorage::new(&dir), &config(LoadPolicy::Strict))
        .await
        .unwrap();
    assert_eq!(restored.snapshot().cart(), &saved);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_blob_uses_snapshot_field_names() {
    let storage = MemoryStorage::new();
    let store = CartStore::load(storage.clone(), &config(LoadPolicy::Strict))
        .await
        .unwrap();

    store.add_to_cart(product("a", "Shirt", 1000));
    store.flush().await.unwrap();

    let blob: serde_json::Value = serde_json::from_str(&storage.blob(KEY).unwrap()).unwrap();
    assert_eq!(
        blob,
        serde_json::json!([{
            "id": "a",
            "title": "Shirt",
            "image_url": "https://cdn.example.com/a.png",
            "price": 10.0,
            "quantity": 1
        }])
    );
}

#[tokio::test]
async fn test_emptied_cart_is_persisted_as_empty_array() {
    let storage = MemoryStorage::new();
    let store = CartStore::load(storage.clone(), &config(LoadPolicy::Strict))
        .await
        .unwrap();

    store.add_to_cart(product("a", "Shirt", 1000));
    store.decrement(&product_id("a"));
    store.flush().await.unwrap();

    assert_eq!(storage.blob(KEY).as_deref(), Some("[]"));
}

// =============================================================================
// Load Policy
// =============================================================================

#[tokio::test]
async fn test_missing_blob_starts_empty() {
    let store = CartStore::load(MemoryStorage::new(), &config(LoadPolicy::Strict))
        .await
        .unwrap();
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn test_corrupt_blob_lenient_starts_empty() {
    let storage = MemoryStorage::with_blob(KEY, "{ not a cart");
    let store = CartStore::load(storage, &config(LoadPolicy::Lenient))
        .await
        .unwrap();
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn test_corrupt_blob_strict_fails() {
    let storage = MemoryStorage::with_blob(KEY, "{ not a cart");
    let result = CartStore::load(storage, &config(LoadPolicy::Strict)).await;
    assert!(matches!(result, Err(LoadError::Decode(_))));
}

#[tokio::test]
async fn test_duplicate_lines_strict_fails() {
    let blob = r#"[
        {"id":"a","title":"A","image_url":"","price":1,"quantity":1},
        {"id":"a","title":"A","image_url":"","price":1,"quantity":3}
    ]"#;
    let storage = MemoryStorage::with_blob(KEY, blob);
    let result = CartStore::load(storage, &config(LoadPolicy::Strict)).await;
    assert!(matches!(result, Err(LoadError::Invalid(_))));
}

#[tokio::test]
async fn test_unavailable_storage_lenient_starts_empty() {
    let storage = MemoryStorage::with_blob(KEY, "[]");
    storage.set_available(false);

    let store = CartStore::load(storage.clone(), &config(LoadPolicy::Lenient))
        .await
        .unwrap();
    assert!(store.items().is_empty());

    let result = CartStore::load(storage, &config(LoadPolicy::Strict)).await;
    assert!(matches!(result, Err(LoadError::Storage(_))));
}

// =============================================================================
// Persister Ordering
// =============================================================================

#[tokio::test]
async fn test_rapid_mutations_leave_latest_snapshot_in_storage() {
    let storage = MemoryStorage::new();
    let store = CartStore::load(storage.clone(), &config(LoadPolicy::Strict))
        .await
        .unwrap();

    // The persister cannot run until this task yields, so all 100 changes
    // are pending when it wakes and collapse into one write.
    for i in 0..100 {
        store.add_to_cart(product(&format!("p{}", i % 7), "Item", 100));
    }
    store.flush().await.unwrap();

    let persisted = codec::decode(&storage.blob(KEY).unwrap()).unwrap();
    assert_eq!(&persisted, store.snapshot().cart());
    assert_eq!(storage.writes(), 1);
    assert_eq!(store.persist_status().committed, 100);
}

#[tokio::test]
async fn test_failed_write_does_not_roll_back_and_recovers() {
    let storage = MemoryStorage::new();
    let store = CartStore::load(storage.clone(), &config(LoadPolicy::Strict))
        .await
        .unwrap();

    storage.set_available(false);
    store.add_to_cart(product("a", "Shirt", 1000));
    assert!(matches!(
        store.flush().await,
        Err(PersistError::NotPersisted { .. })
    ));
    assert_eq!(store.items().len(), 1);

    storage.set_available(true);
    store.add_to_cart(product("b", "Socks", 300));
    store.flush().await.unwrap();

    let persisted = codec::decode(&storage.blob(KEY).unwrap()).unwrap();
    assert_eq!(persisted.len(), 2);
}

#[tokio::test]
async fn test_dropping_store_still_writes_pending_snapshot() {
    let storage = MemoryStorage::new();
    let store = CartStore::with_cart(storage.clone(), KEY, Cart::new());

    store.add_to_cart(product("a", "Shirt", 1000));
    drop(store);

    // The persister drains on its own task once the store is gone.
    for _ in 0..100 {
        if storage.blob(KEY).is_some() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(storage.get(KEY).await.unwrap().is_some());
}
