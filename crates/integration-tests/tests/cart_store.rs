//! Integration tests for cart operations through the store.
//!
//! These tests drive the public `CartStore` API the way screens do and check
//! the snapshots they would render.

#![allow(clippy::unwrap_used)]

use pineapple_cart_core::{Cart, CartChange, Quantity};
use pineapple_cart_integration_tests::{product, product_id};
use pineapple_cart_store::{AppContext, CartStore, MemoryStorage, StoreConfig, UsageError};

fn lines(store: &CartStore) -> Vec<(String, u32)> {
    store
        .items()
        .into_iter()
        .map(|item| (item.id.into_inner(), item.quantity.get()))
        .collect()
}

fn line(id: &str, quantity: u32) -> (String, u32) {
    (id.to_string(), quantity)
}

async fn empty_store() -> CartStore {
    CartStore::load(MemoryStorage::new(), &StoreConfig::default())
        .await
        .unwrap()
}

// =============================================================================
// Quantity Rules
// =============================================================================

#[tokio::test]
async fn test_adding_same_product_twice_makes_one_line() {
    let store = empty_store().await;

    store.add_to_cart(product("a", "Shirt", 1000));
    store.add_to_cart(product("a", "Shirt", 1000));

    assert_eq!(lines(&store), vec![line("a", 2)]);
}

#[tokio::test]
async fn test_decrement_above_one_keeps_line() {
    let store = empty_store().await;
    for _ in 0..4 {
        store.add_to_cart(product("a", "Shirt", 1000));
    }

    let change = store.decrement(&product_id("a"));

    assert_eq!(
        change,
        CartChange::Decremented {
            quantity: Quantity::new(3).unwrap()
        }
    );
    assert_eq!(lines(&store), vec![line("a", 3)]);
}

#[tokio::test]
async fn test_decrement_at_one_removes_line() {
    let store = empty_store().await;
    store.add_to_cart(product("a", "Shirt", 1000));

    assert_eq!(store.decrement(&product_id("a")), CartChange::Removed);
    assert!(store.items().is_empty());
    assert!(store.get(&product_id("a")).is_none());
}

#[tokio::test]
async fn test_unknown_product_leaves_cart_unchanged() {
    let store = empty_store().await;
    store.add_to_cart(product("a", "Shirt", 1000));
    let before = store.snapshot();

    assert_eq!(store.increment(&product_id("zzz")), CartChange::Unchanged);
    assert_eq!(store.decrement(&product_id("zzz")), CartChange::Unchanged);

    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn test_re_add_keeps_stored_details() {
    let store = empty_store().await;
    store.add_to_cart(product("a", "Shirt", 1000));
    store.add_to_cart(product("a", "Renamed Shirt", 1));

    let item = store.get(&product_id("a")).unwrap();
    assert_eq!(item.title, "Shirt");
    assert_eq!(item.price.to_string(), "$10.00");
    assert_eq!(item.quantity.get(), 2);
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_add_decrement_decrement_scenario() {
    let store = empty_store().await;

    store.add_to_cart(product("a", "Shirt", 1000));
    assert_eq!(lines(&store), vec![line("a", 1)]);

    store.add_to_cart(product("a", "Shirt", 1000));
    assert_eq!(lines(&store), vec![line("a", 2)]);

    store.decrement(&product_id("a"));
    assert_eq!(lines(&store), vec![line("a", 1)]);

    store.decrement(&product_id("a"));
    assert_eq!(lines(&store), vec![]);
}

#[tokio::test]
async fn test_increment_preserves_order_of_untouched_lines() {
    let store = empty_store().await;

    store.add_to_cart(product("x", "Hat", 500));
    store.add_to_cart(product("y", "Scarf", 700));
    store.increment(&product_id("x"));

    assert_eq!(lines(&store), vec![line("x", 2), line("y", 1)]);
}

#[tokio::test]
async fn test_line_can_leave_and_come_back() {
    let store = empty_store().await;

    store.add_to_cart(product("a", "Shirt", 1000));
    store.add_to_cart(product("b", "Socks", 300));
    store.decrement(&product_id("a"));
    store.add_to_cart(product("a", "Shirt", 1000));

    assert_eq!(lines(&store), vec![line("b", 1), line("a", 1)]);
}

// =============================================================================
// Subscribers
// =============================================================================

#[tokio::test]
async fn test_subscriber_receives_complete_snapshot() {
    let store = empty_store().await;
    let mut subscription = store.subscribe();

    store.add_to_cart(product("a", "Shirt", 1000));
    let snapshot = subscription.changed().await.unwrap();
    assert_eq!(snapshot.items().len(), 1);

    store.add_to_cart(product("b", "Socks", 300));
    let snapshot = subscription.changed().await.unwrap();
    assert_eq!(snapshot.items().len(), 2);
    assert_eq!(snapshot.cart().item_count(), 2);
}

#[tokio::test]
async fn test_subscription_ends_when_store_is_dropped() {
    let store = empty_store().await;
    let mut subscription = store.subscribe();

    drop(store);

    assert!(subscription.changed().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_all_apply() {
    let store = empty_store().await;
    store.add_to_cart(product("a", "Shirt", 1000));

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store.increment(&product_id("a"));
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(lines(&store), vec![line("a", 51)]);
    assert_eq!(store.snapshot().sequence(), 51);
}

// =============================================================================
// Context
// =============================================================================

#[tokio::test]
async fn test_context_hands_out_the_same_cart() {
    let store = CartStore::with_cart(MemoryStorage::new(), "k", Cart::new());
    let context = AppContext::new().with_cart(store);

    let product_screen = context.clone();
    let cart_screen = context.clone();

    product_screen
        .cart()
        .add_to_cart(product("a", "Shirt", 1000));

    assert_eq!(lines(cart_screen.cart()), vec![line("a", 1)]);
}

#[test]
fn test_context_without_cart_is_a_usage_error() {
    let context = AppContext::new();
    assert_eq!(context.try_cart().unwrap_err(), UsageError::MissingProvider);
}
